//! Calendar engine: date arithmetic and month grid layout

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::visit::Visit,
};

/// One calendar row; `None` pads days outside the month
pub type WeekRow = [Option<NaiveDate>; 7];

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A day cell with the visits recorded on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub visits: Vec<Visit>,
}

/// A month ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    /// Zero-indexed month
    pub month: u32,
    pub weekdays: [&'static str; 7],
    pub weeks: Vec<Vec<Option<CalendarCell>>>,
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn year_length(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Number of days in a zero-indexed month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Every day of `year`, Jan 1 through Dec 31
pub fn days_in_year(year: i32) -> Vec<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, 1, 1) {
        Some(first) => first
            .iter_days()
            .take_while(|d| d.year() == year)
            .collect(),
        None => Vec::new(),
    }
}

/// Inclusive day-by-day expansion. An inverted range yields nothing.
pub fn expand_date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Same year, month and day of month; time of day is ignored
pub fn day_equals<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Visits recorded on `date`
pub fn visits_on_day<'a, D: Datelike>(date: &D, visits: &'a [Visit]) -> Vec<&'a Visit> {
    visits.iter().filter(|v| day_equals(&v.date, date)).collect()
}

/// Weekday headers starting at `week_start` (0=Sunday)
pub fn weekday_labels(week_start: u8) -> [&'static str; 7] {
    let mut labels = WEEKDAY_LABELS;
    labels.rotate_left(usize::from(week_start % 7));
    labels
}

/// Lay out a zero-indexed month as rows of seven cells.
///
/// The first row is left-padded up to the 1st, the last row right-padded
/// to seven cells. Produces 4 to 6 rows.
pub fn month_grid(year: i32, month: u32, week_start: u8) -> AppResult<Vec<WeekRow>> {
    if month > 11 {
        return Err(AppError::Validation(format!(
            "month must be between 0 and 11, got {}",
            month
        )));
    }
    if week_start > 6 {
        return Err(AppError::Validation(format!(
            "week start must be between 0 (Sunday) and 6 (Saturday), got {}",
            week_start
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month + 1, 1)
        .ok_or_else(|| AppError::Validation(format!("year {} is out of range", year)))?;

    let leading = (first.weekday().num_days_from_sunday() + 7 - u32::from(week_start)) % 7;

    let mut cells: Vec<Option<NaiveDate>> = Vec::with_capacity(42);
    cells.extend((0..leading).map(|_| None));
    cells.extend(
        first
            .iter_days()
            .take(days_in_month(year, month) as usize)
            .map(Some),
    );
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    Ok(cells
        .chunks_exact(7)
        .map(|chunk| {
            let mut row: WeekRow = [None; 7];
            row.copy_from_slice(chunk);
            row
        })
        .collect())
}

/// Month grid with each day's visits attached
pub fn month_view(year: i32, month: u32, week_start: u8, visits: &[Visit]) -> AppResult<MonthView> {
    let weeks: Vec<Vec<Option<CalendarCell>>> = month_grid(year, month, week_start)?
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.map(|date| CalendarCell {
                        date,
                        visits: visits_on_day(&date, visits).into_iter().cloned().collect(),
                    })
                })
                .collect()
        })
        .collect();

    Ok(MonthView {
        year,
        month,
        weekdays: weekday_labels(week_start),
        weeks,
    })
}
