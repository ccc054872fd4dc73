//! Yearly
//!
//! Records the countries visited on each day of a year and derives the
//! calendar grid and itinerary statistics shown to the user.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state owned by the front end
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub services: services::Services,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let repository = repository::Repository::new(&config.storage);
        let services = services::Services::new(repository, &config)?;
        Ok(Self { config, services })
    }
}
