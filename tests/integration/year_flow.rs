//! End-to-end flow: record visits, reopen the store, read stats and calendar

use chrono::NaiveDate;
use yearly::{
    config::{AppConfig, StorageConfig},
    models::visit::CreateVisits,
    services::calendar::month_grid,
    AppError, AppState,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn config(dir: &tempfile::TempDir) -> AppConfig {
    AppConfig {
        storage: StorageConfig {
            path: dir.path().join("yearly.json").to_string_lossy().into_owned(),
            max_visits: 730,
        },
        ..Default::default()
    }
}

#[test]
fn test_trip_through_the_year() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::new(config(&dir)).unwrap();
    let visits = &mut state.services.visits;

    visits.add(&CreateVisits::single_day("MA", d(2023, 4, 13))).unwrap();
    visits.add(&CreateVisits::new("UG", d(2023, 4, 13), d(2023, 4, 18))).unwrap();
    visits.add(&CreateVisits::single_day("MA", d(2023, 4, 18))).unwrap();

    let err = visits
        .add(&CreateVisits::single_day("KE", d(2023, 4, 18)))
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert!(err.to_string().contains("2023-04-18"));

    let stats = state.services.year_stats(2023, 3);
    assert_eq!(stats.total_visits, 3);
    assert_eq!(stats.total_countries_visited, 2);
    assert_eq!(stats.total_days_traveled, 6);
    assert_eq!(stats.top_countries_by_days[0].country_code, "UG");
    assert_eq!(stats.top_countries_by_days[0].name, "Uganda");
    assert_eq!(stats.top_countries_by_days[0].value, 6);
    assert_eq!(stats.most_visited_countries[0].country_code, "MA");
    assert_eq!(stats.most_visited_countries[0].value, 2);
    assert_eq!(stats.busiest_month, Some(3));
    assert_eq!(stats.monthly_breakdown[3].visits, 8);

    // Reopening reads the same data back
    let reopened = AppState::new(config(&dir)).unwrap();
    assert_eq!(reopened.services.year_stats(2023, 3), stats);

    let view = reopened.services.month_view(2023, 3).unwrap();
    let busy_day = view
        .weeks
        .iter()
        .flatten()
        .flatten()
        .find(|cell| cell.date == d(2023, 4, 13))
        .unwrap();
    assert_eq!(busy_day.visits.len(), 2);
}

#[test]
fn test_corrupted_store_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    std::fs::write(&config.storage.path, r#"{"visits": [{"id": 1}]}"#).unwrap();

    let state = AppState::new(config).unwrap();
    assert!(state.services.visits.list().is_empty());
    assert_eq!(state.services.year_stats(2023, 0).percentage_of_year_traveled, 0.0);
}

#[test]
fn test_export_import_between_stores() {
    let source_dir = tempfile::tempdir().unwrap();
    let mut source = AppState::new(config(&source_dir)).unwrap();
    source
        .services
        .visits
        .add(&CreateVisits::new("FR", d(2024, 2, 27), d(2024, 3, 1)))
        .unwrap();
    let exported = source.services.visits.export().unwrap();

    let target_dir = tempfile::tempdir().unwrap();
    let mut target = AppState::new(config(&target_dir)).unwrap();
    assert_eq!(target.services.visits.import(&exported).unwrap(), 4);
    assert_eq!(target.services.visits.list(), source.services.visits.list());

    let stats = target.services.year_stats(2024, 0);
    assert_eq!(stats.stays.len(), 1);
    assert_eq!(stats.stays[0].day_count, 4);
}

#[test]
fn test_week_start_from_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    config.display.week_start = 1;
    let state = AppState::new(config).unwrap();

    let view = state.services.month_view(2023, 0).unwrap();
    assert_eq!(view.weekdays[0], "Mon");
    assert_eq!(view.weeks.len(), month_grid(2023, 0, 1).unwrap().len());
    assert_eq!(view.weeks[0][6].as_ref().map(|c| c.date), Some(d(2023, 1, 1)));
}
