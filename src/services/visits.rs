//! Visits service: per-day constraints, range expansion and the visit ledger

use chrono::{Datelike, NaiveDate};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::visit::{CreateVisits, Visit, VisitCollection},
    repository::visits::{decode_collection, VisitsRepository},
    services::calendar::{expand_date_range, visits_on_day},
};

/// Maximum number of countries on a single day
pub const MAX_COUNTRIES_PER_DAY: usize = 2;

/// True while `date` holds fewer than two visits
pub fn can_add_visit_to_day<D: Datelike>(date: &D, existing: &[Visit]) -> bool {
    visits_on_day(date, existing).len() < MAX_COUNTRIES_PER_DAY
}

pub fn has_visit_for_country_on_day<D: Datelike>(
    date: &D,
    country_code: &str,
    existing: &[Visit],
) -> bool {
    visits_on_day(date, existing)
        .iter()
        .any(|v| v.country_code == country_code)
}

/// Validate a submission against `existing` and build its visits.
///
/// Days are checked in ascending order and the first offending day
/// fails the whole batch; nothing is returned for a partial range.
pub fn prepare_visits(request: &CreateVisits, existing: &[Visit]) -> AppResult<Vec<Visit>> {
    request.validate()?;

    let end = request.end();
    if end < request.start_date {
        return Err(AppError::BadRequest(format!(
            "end date {} is before start date {}",
            end, request.start_date
        )));
    }

    let days = expand_date_range(request.start_date, end);
    for day in &days {
        if has_visit_for_country_on_day(day, &request.country_code, existing) {
            return Err(AppError::Conflict(format!(
                "{} already recorded for {}",
                request.country_code, day
            )));
        }
        if !can_add_visit_to_day(day, existing) {
            return Err(AppError::BusinessRule(format!(
                "maximum two countries per day exceeded for {}",
                day
            )));
        }
    }

    tracing::debug!(
        country = %request.country_code,
        days = days.len(),
        "Prepared visits"
    );

    Ok(days
        .into_iter()
        .map(|day| Visit::new(request.country_code.clone(), day))
        .collect())
}

/// Owner of the canonical visit list and its store
#[derive(Debug)]
pub struct VisitsService {
    repository: VisitsRepository,
    visits: Vec<Visit>,
}

impl VisitsService {
    /// Load stored visits, starting empty when there is nothing usable
    pub fn open(repository: VisitsRepository) -> AppResult<Self> {
        let visits = match repository.load()? {
            Some(collection) => collection.visits,
            None => {
                tracing::info!("Starting with an empty visit list");
                Vec::new()
            }
        };
        Ok(Self { repository, visits })
    }

    pub fn list(&self) -> &[Visit] {
        &self.visits
    }

    pub fn visits_on_day(&self, date: NaiveDate) -> Vec<&Visit> {
        visits_on_day(&date, &self.visits)
    }

    /// Add one visit per day of the requested range
    pub fn add(&mut self, request: &CreateVisits) -> AppResult<Vec<Visit>> {
        // Size the range before expanding it
        let requested = request.day_count();
        let max = self.repository.max_visits();
        if requested > 0 && self.visits.len() as i64 + requested > max as i64 {
            return Err(AppError::BusinessRule(format!(
                "visit limit of {} reached ({} recorded, {} requested)",
                max,
                self.visits.len(),
                requested
            )));
        }

        let batch = prepare_visits(request, &self.visits)?;

        let previous_len = self.visits.len();
        self.visits.extend(batch.iter().cloned());
        if let Err(e) = self.persist() {
            self.visits.truncate(previous_len);
            return Err(e);
        }

        tracing::info!(
            country = %request.country_code,
            added = batch.len(),
            "Visits added"
        );
        Ok(batch)
    }

    /// Remove a single visit by id
    pub fn remove(&mut self, id: &str) -> AppResult<Visit> {
        let index = self
            .visits
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| AppError::NotFound(format!("visit with id {} not found", id)))?;

        let removed = self.visits.remove(index);
        if let Err(e) = self.persist() {
            self.visits.insert(index, removed);
            return Err(e);
        }
        tracing::info!(id = %id, "Visit removed");
        Ok(removed)
    }

    /// Drop every visit
    pub fn reset(&mut self) -> AppResult<()> {
        self.repository.clear()?;
        self.visits.clear();
        tracing::info!("Visit list reset");
        Ok(())
    }

    /// Replace every visit with an imported collection.
    ///
    /// Malformed input leaves the current list untouched.
    pub fn import(&mut self, json: &str) -> AppResult<usize> {
        let collection = decode_collection(json, self.repository.max_visits()).map_err(|e| {
            tracing::warn!(error = %e, "Import rejected");
            e
        })?;

        self.repository.save(&collection)?;
        self.visits = collection.visits;
        tracing::info!(visits = self.visits.len(), "Visits imported");
        Ok(self.visits.len())
    }

    /// Serialized wire shape of the current list
    pub fn export(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn snapshot(&self) -> VisitCollection {
        VisitCollection {
            visits: self.visits.clone(),
        }
    }

    fn persist(&self) -> AppResult<()> {
        self.repository.save(&self.snapshot())
    }
}
