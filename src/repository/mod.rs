//! Repository layer for visit persistence

pub mod visits;

use crate::config::StorageConfig;

/// Main repository struct holding the stores
#[derive(Clone, Debug)]
pub struct Repository {
    pub visits: visits::VisitsRepository,
}

impl Repository {
    /// Create a new repository from the storage settings
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            visits: visits::VisitsRepository::new(&storage.path, storage.max_visits),
        }
    }
}
