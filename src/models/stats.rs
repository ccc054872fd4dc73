//! Statistics result types

use chrono::NaiveDate;
use serde::Serialize;

/// A maximal run of consecutive days spent in one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub country_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_count: u32,
}

/// Days spent per country (every visit row counts)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDays {
    pub country_code: String,
    pub days: usize,
}

/// Stays per country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryVisits {
    pub country_code: String,
    pub visits: usize,
}

/// Raw counts for one month of the year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    /// Zero-indexed month (0=January)
    pub month: u32,
    /// Number of visit rows
    pub visits: usize,
    /// Number of distinct countries
    pub countries: usize,
}

/// Country ranking entry with its display name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCountry {
    pub country_code: String,
    pub name: String,
    pub flag: String,
    pub value: usize,
}

/// Everything shown on the statistics panel for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStats {
    pub year: i32,
    pub total_countries_visited: usize,
    /// Number of stays, not visit rows
    pub total_visits: usize,
    pub total_days_traveled: usize,
    pub average_days_per_country: f64,
    pub average_visits_per_country: f64,
    /// Zero-indexed month with the most distinct travel days
    pub busiest_month: Option<u32>,
    pub percentage_of_year_traveled: f64,
    pub top_countries_by_days: Vec<RankedCountry>,
    pub most_visited_countries: Vec<RankedCountry>,
    pub least_visited_countries: Vec<RankedCountry>,
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
    pub stays: Vec<Stay>,
}
