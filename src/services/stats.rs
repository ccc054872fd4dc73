//! Itinerary statistics: stay consolidation and yearly metrics
//!
//! Every function here is a pure mapping from a visit slice (and, where
//! relevant, a year) to its result. Functions taking a `year` filter the
//! visits themselves; the others work on whatever slice they are given,
//! so callers wanting per-year numbers pass `visits_in_year(..)`.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::{
    models::{
        country::{Country, CountryDirectory},
        stats::{CountryDays, CountryVisits, MonthlyBreakdown, RankedCountry, Stay, YearStats},
        visit::Visit,
    },
    services::calendar::year_length,
};

/// Visits falling in `year`
pub fn visits_in_year(visits: &[Visit], year: i32) -> Vec<Visit> {
    visits
        .iter()
        .filter(|v| v.date.year() == year)
        .cloned()
        .collect()
}

/// Visits ordered by day; visits on the same day keep their input order
fn sorted_by_date(visits: &[Visit]) -> Vec<&Visit> {
    let mut sorted: Vec<&Visit> = visits.iter().collect();
    sorted.sort_by_key(|v| v.date);
    sorted
}

/// Merge consecutive same-country days into stays.
///
/// A different country, or any gap between days, closes the current
/// stay. Returning to a country later opens a new stay.
pub fn consolidate_stays(visits: &[Visit]) -> Vec<Stay> {
    let mut stays: Vec<Stay> = Vec::new();
    let mut current: Option<Stay> = None;

    for visit in sorted_by_date(visits) {
        if let Some(stay) = current.as_mut() {
            if stay.country_code == visit.country_code
                && stay.end_date.succ_opt() == Some(visit.date)
            {
                stay.end_date = visit.date;
                stay.day_count += 1;
                continue;
            }
        }
        stays.extend(current.take());
        current = Some(Stay {
            country_code: visit.country_code.clone(),
            start_date: visit.date,
            end_date: visit.date,
            day_count: 1,
        });
    }
    stays.extend(current);
    stays
}

/// Distinct country codes
pub fn total_countries_visited(visits: &[Visit]) -> usize {
    visits
        .iter()
        .map(|v| v.country_code.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Trip count: number of stays, not visit rows
pub fn total_visits(visits: &[Visit]) -> usize {
    consolidate_stays(visits).len()
}

/// Distinct calendar days with at least one visit
pub fn total_days_traveled(visits: &[Visit]) -> usize {
    visits.iter().map(|v| v.date).collect::<HashSet<_>>().len()
}

/// Day totals per country, every visit row counting once.
/// Countries appear in order of their first visit.
pub fn days_by_country(visits: &[Visit]) -> IndexMap<String, usize> {
    let mut days: IndexMap<String, usize> = IndexMap::new();
    for visit in sorted_by_date(visits) {
        *days.entry(visit.country_code.clone()).or_insert(0) += 1;
    }
    days
}

/// Countries by day total, descending; `limit` 0 keeps them all
pub fn countries_by_days(visits: &[Visit], limit: usize) -> Vec<CountryDays> {
    let mut ranked: Vec<CountryDays> = days_by_country(visits)
        .into_iter()
        .map(|(country_code, days)| CountryDays { country_code, days })
        .collect();
    ranked.sort_by(|a, b| b.days.cmp(&a.days));
    truncate(ranked, limit)
}

pub fn average_days_per_country(visits: &[Visit]) -> f64 {
    ratio(total_days_traveled(visits), total_countries_visited(visits))
}

/// Zero-indexed month with the most distinct travel days in `year`.
/// Ties go to the earlier month.
pub fn busiest_month(visits: &[Visit], year: i32) -> Option<u32> {
    let mut days_per_month: [BTreeSet<NaiveDate>; 12] = Default::default();
    for visit in visits.iter().filter(|v| v.date.year() == year) {
        days_per_month[visit.date.month0() as usize].insert(visit.date);
    }

    let mut busiest: Option<(u32, usize)> = None;
    for (month, days) in days_per_month.iter().enumerate() {
        let count = days.len();
        if count > busiest.map_or(0, |(_, best)| best) {
            busiest = Some((month as u32, count));
        }
    }
    busiest.map(|(month, _)| month)
}

/// Share of the year's days with travel, from 0 to 100
pub fn percentage_of_year_traveled(visits: &[Visit], year: i32) -> f64 {
    let traveled = total_days_traveled(&visits_in_year(visits, year));
    traveled as f64 / f64::from(year_length(year)) * 100.0
}

/// Stay count per country, in order of first stay
fn stays_by_country(visits: &[Visit]) -> Vec<CountryVisits> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for stay in consolidate_stays(visits) {
        *counts.entry(stay.country_code).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(country_code, visits)| CountryVisits { country_code, visits })
        .collect()
}

/// Countries ranked by number of stays, descending
pub fn most_visited_countries(visits: &[Visit], limit: usize) -> Vec<CountryVisits> {
    let mut ranked = stays_by_country(visits);
    ranked.sort_by(|a, b| b.visits.cmp(&a.visits));
    truncate(ranked, limit)
}

/// Countries ranked by number of stays, ascending
pub fn least_visited_countries(visits: &[Visit], limit: usize) -> Vec<CountryVisits> {
    let mut ranked = stays_by_country(visits);
    ranked.sort_by(|a, b| a.visits.cmp(&b.visits));
    truncate(ranked, limit)
}

/// Visit rows and distinct countries for each month of `year`
pub fn monthly_breakdown(visits: &[Visit], year: i32) -> Vec<MonthlyBreakdown> {
    (0..12)
        .map(|month| {
            let in_month: Vec<&Visit> = visits
                .iter()
                .filter(|v| v.date.year() == year && v.date.month0() == month)
                .collect();
            MonthlyBreakdown {
                month,
                visits: in_month.len(),
                countries: in_month
                    .iter()
                    .map(|v| v.country_code.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
            }
        })
        .collect()
}

/// Stays per distinct country
pub fn average_visits_per_country(visits: &[Visit]) -> f64 {
    ratio(total_visits(visits), total_countries_visited(visits))
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn truncate<T>(mut ranked: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        ranked.truncate(limit);
    }
    ranked
}

fn rank_entry<D>(directory: &D, country_code: String, value: usize) -> RankedCountry
where
    D: CountryDirectory + ?Sized,
{
    let country = directory.lookup(&country_code).unwrap_or_else(|| Country {
        code: country_code.clone(),
        name: country_code.clone(),
    });
    RankedCountry {
        flag: country.flag_emoji(),
        name: country.name,
        country_code,
        value,
    }
}

impl YearStats {
    /// Compute every panel metric for `year`; rankings hold at most
    /// `top_limit` entries (0 for all)
    pub fn compute<D>(visits: &[Visit], year: i32, directory: &D, top_limit: usize) -> Self
    where
        D: CountryDirectory + ?Sized,
    {
        let in_year = visits_in_year(visits, year);

        let top_countries_by_days = countries_by_days(&in_year, top_limit)
            .into_iter()
            .map(|c| rank_entry(directory, c.country_code, c.days))
            .collect();
        let most_visited_countries = most_visited_countries(&in_year, top_limit)
            .into_iter()
            .map(|c| rank_entry(directory, c.country_code, c.visits))
            .collect();
        let least_visited_countries = least_visited_countries(&in_year, top_limit)
            .into_iter()
            .map(|c| rank_entry(directory, c.country_code, c.visits))
            .collect();

        Self {
            year,
            total_countries_visited: total_countries_visited(&in_year),
            total_visits: total_visits(&in_year),
            total_days_traveled: total_days_traveled(&in_year),
            average_days_per_country: average_days_per_country(&in_year),
            average_visits_per_country: average_visits_per_country(&in_year),
            busiest_month: busiest_month(&in_year, year),
            percentage_of_year_traveled: percentage_of_year_traveled(&in_year, year),
            top_countries_by_days,
            most_visited_countries,
            least_visited_countries,
            monthly_breakdown: monthly_breakdown(&in_year, year),
            stays: consolidate_stays(&in_year),
        }
    }
}
