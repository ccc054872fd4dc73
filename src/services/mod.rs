//! Business logic services

pub mod calendar;
pub mod stats;
pub mod visits;

use chrono::NaiveDate;

use crate::{
    config::AppConfig,
    error::AppResult,
    models::{country::IsoCountryDirectory, preferences::DisplayPreferences, stats::YearStats},
    repository::Repository,
};

/// Container for all services
#[derive(Debug)]
pub struct Services {
    pub visits: visits::VisitsService,
    pub countries: IsoCountryDirectory,
    pub preferences: DisplayPreferences,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            visits: visits::VisitsService::open(repository.visits)?,
            countries: IsoCountryDirectory,
            preferences: config.display.clone(),
        })
    }

    /// Statistics panel for `year`
    pub fn year_stats(&self, year: i32, top_limit: usize) -> YearStats {
        YearStats::compute(self.visits.list(), year, &self.countries, top_limit)
    }

    /// Calendar month (zero-indexed) laid out with the configured week start.
    /// An out-of-range configured week start falls back to Sunday.
    pub fn month_view(&self, year: i32, month: u32) -> AppResult<calendar::MonthView> {
        let week_start = self.preferences.week_start_day().num_days_from_sunday() as u8;
        calendar::month_view(year, month, week_start, self.visits.list())
    }

    pub fn today(&self) -> Option<NaiveDate> {
        self.preferences
            .highlight_today
            .then(|| chrono::Local::now().date_naive())
    }
}
