//! Visits repository (JSON file store)

use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::visit::{VisitCollection, COUNTRY_CODE_RE},
};

#[derive(Clone, Debug)]
pub struct VisitsRepository {
    path: PathBuf,
    max_visits: usize,
}

impl VisitsRepository {
    pub fn new(path: impl AsRef<Path>, max_visits: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_visits,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_visits(&self) -> usize {
        self.max_visits
    }

    /// Load the stored collection.
    ///
    /// A missing file and a file that fails validation both return
    /// `Ok(None)`; only I/O failures are errors.
    pub fn load(&self) -> AppResult<Option<VisitCollection>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match decode_collection(&raw, self.max_visits) {
            Ok(collection) => {
                tracing::info!(path = %self.path.display(), "Loaded visit store");
                Ok(Some(collection))
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable visit store"
                );
                Ok(None)
            }
        }
    }

    /// Write the collection, replacing the previous file atomically
    pub fn save(&self, collection: &VisitCollection) -> AppResult<()> {
        let json = serde_json::to_string_pretty(collection)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            visits = collection.visits.len(),
            "Saved visit store"
        );
        Ok(())
    }

    /// Remove the stored file, if any
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Parse and validate a serialized collection.
///
/// Input that is not UTF-8 JSON of the expected shape, or that breaks a
/// per-day rule, is a `Validation` error naming the first problem.
pub fn decode_collection(
    json: impl AsRef<[u8]>,
    max_visits: usize,
) -> AppResult<VisitCollection> {
    let collection: VisitCollection = serde_json::from_slice(json.as_ref())
        .map_err(|e| AppError::Validation(format!("malformed visit data: {}", e)))?;
    validate_collection(&collection, max_visits)?;
    Ok(collection)
}

/// Structural checks applied to anything loaded or imported
pub fn validate_collection(collection: &VisitCollection, max_visits: usize) -> AppResult<()> {
    if collection.visits.len() > max_visits {
        return Err(AppError::Validation(format!(
            "{} visits exceed the limit of {}",
            collection.visits.len(),
            max_visits
        )));
    }

    let mut ids = HashSet::new();
    let mut per_day: HashMap<NaiveDate, Vec<&str>> = HashMap::new();

    for visit in &collection.visits {
        if visit.id.is_empty() {
            return Err(AppError::Validation("visit with empty id".to_string()));
        }
        if !ids.insert(visit.id.as_str()) {
            return Err(AppError::Validation(format!("duplicate visit id {}", visit.id)));
        }
        if !COUNTRY_CODE_RE.is_match(&visit.country_code) {
            return Err(AppError::Validation(format!(
                "invalid country code {:?}",
                visit.country_code
            )));
        }

        let day = per_day.entry(visit.date).or_default();
        if day.contains(&visit.country_code.as_str()) {
            return Err(AppError::Validation(format!(
                "{} recorded twice for {}",
                visit.country_code, visit.date
            )));
        }
        day.push(visit.country_code.as_str());
        if day.len() > 2 {
            return Err(AppError::Validation(format!(
                "more than two countries recorded for {}",
                visit.date
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::visit::Visit;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn repo(dir: &tempfile::TempDir) -> VisitsRepository {
        VisitsRepository::new(dir.path().join("visits.json"), 730)
    }

    #[test]
    fn test_missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(repo(&dir).load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir);
        let collection = VisitCollection {
            visits: vec![Visit::new("UG", d(2023, 4, 13)), Visit::new("MA", d(2023, 4, 13))],
        };
        repo.save(&collection).unwrap();
        assert_eq!(repo.load().unwrap(), Some(collection));
        assert!(!dir.path().join("visits.json.tmp").exists());
    }

    #[test]
    fn test_corrupted_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir);
        fs::write(repo.path(), "{not json").unwrap();
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn test_non_utf8_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir);
        fs::write(repo.path(), [0xff, 0xfe, b'{', 0x80]).unwrap();
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir);
        repo.save(&VisitCollection::default()).unwrap();
        repo.clear().unwrap();
        assert!(!repo.path().exists());
        repo.clear().unwrap();
    }

    #[test]
    fn test_rejects_structural_errors() {
        let cases = [
            r#"{"visits": [{"id": "a", "countryCode": "UG"}]}"#,
            r#"{"visits": [{"id": "a", "countryCode": "UG", "date": "yesterday"}]}"#,
            r#"{"visits": [{"id": "a", "countryCode": 12, "date": "2023-04-13T00:00:00.000Z"}]}"#,
            r#"{"visits": [{"id": "a", "countryCode": "uga", "date": "2023-04-13T00:00:00.000Z"}]}"#,
            r#"{"items": []}"#,
        ];
        for case in cases {
            assert!(
                matches!(decode_collection(case, 730), Err(AppError::Validation(_))),
                "accepted {}",
                case
            );
        }
    }

    #[test]
    fn test_rejects_invariant_violations() {
        let dup_country = r#"{"visits": [
            {"id": "a", "countryCode": "UG", "date": "2023-04-13T00:00:00.000Z"},
            {"id": "b", "countryCode": "UG", "date": "2023-04-13T10:00:00.000Z"}
        ]}"#;
        assert!(decode_collection(dup_country, 730).unwrap_err().to_string().contains("twice"));

        let three = r#"{"visits": [
            {"id": "a", "countryCode": "UG", "date": "2023-04-13"},
            {"id": "b", "countryCode": "MA", "date": "2023-04-13"},
            {"id": "c", "countryCode": "FR", "date": "2023-04-13"}
        ]}"#;
        assert!(decode_collection(three, 730).unwrap_err().to_string().contains("more than two"));

        let dup_id = r#"{"visits": [
            {"id": "a", "countryCode": "UG", "date": "2023-04-13"},
            {"id": "a", "countryCode": "MA", "date": "2023-04-14"}
        ]}"#;
        assert!(decode_collection(dup_id, 730).unwrap_err().to_string().contains("duplicate visit id"));
    }

    #[test]
    fn test_rejects_over_limit() {
        let collection = VisitCollection {
            visits: vec![Visit::new("UG", d(2023, 4, 13)), Visit::new("UG", d(2023, 4, 14))],
        };
        assert!(validate_collection(&collection, 1).is_err());
        assert!(validate_collection(&collection, 2).is_ok());
    }
}
