//! File-backed record store.
//!
//! ## Storage Layout
//!
//! ```text
//! <patient_data_dir>/records/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         record.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id. Each document is
//! written to a temporary file and renamed into place, so a reader never sees a half-written
//! record.

use super::RecordStore;
use crate::constants::RECORD_FILENAME;
use crate::error::{PatientError, PatientResult};
use crate::record::PatientRecord;
use ehr_types::EhrId;
use ehr_uuid::RecordId;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const TEMP_SUFFIX: &str = "tmp";

#[derive(Debug)]
pub struct FileStore {
    records_dir: PathBuf,
    // Serialises the check-then-write sequences; reads go straight to disk.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens (creating if needed) the records directory.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::StorageDirCreation`] if the directory cannot be created.
    pub fn open(records_dir: impl Into<PathBuf>) -> PatientResult<Self> {
        let records_dir = records_dir.into();
        fs::create_dir_all(&records_dir).map_err(PatientError::StorageDirCreation)?;
        Ok(Self {
            records_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        id.sharded_dir(&self.records_dir).join(RECORD_FILENAME)
    }

    fn lock(&self) -> PatientResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| PatientError::LockPoisoned)
    }

    fn read_record(path: &Path) -> PatientResult<PatientRecord> {
        let contents = fs::read_to_string(path).map_err(PatientError::FileRead)?;
        serde_json::from_str(&contents).map_err(PatientError::Deserialization)
    }

    fn write_record(&self, record: &PatientRecord) -> PatientResult<()> {
        let path = self.record_path(&record.id);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(PatientError::FileWrite)?;
        }

        let json = serde_json::to_string_pretty(record).map_err(PatientError::Serialization)?;
        let temp_path = path.with_extension(TEMP_SUFFIX);
        fs::write(&temp_path, json).map_err(PatientError::FileWrite)?;
        fs::rename(&temp_path, &path).map_err(PatientError::FileWrite)
    }

    fn ensure_ehr_id_free(&self, ehr_id: &EhrId, owner: &RecordId) -> PatientResult<()> {
        let taken = self
            .scan()?
            .into_iter()
            .any(|r| r.ehr_id == *ehr_id && r.id != *owner);
        if taken {
            return Err(PatientError::Conflict(ehr_id.clone()));
        }
        Ok(())
    }

    /// Walks the sharded tree and loads every record document.
    ///
    /// Documents that cannot be read or parsed are logged and skipped.
    fn scan(&self) -> PatientResult<Vec<PatientRecord>> {
        let mut records = Vec::new();

        let s1_iter = match fs::read_dir(&self.records_dir) {
            Ok(it) => it,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(PatientError::FileRead(e)),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let Ok(s2_iter) = fs::read_dir(&s1_path) else {
                continue;
            };
            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let Ok(id_iter) = fs::read_dir(&s2_path) else {
                    continue;
                };
                for id_ent in id_iter.flatten() {
                    let record_path = id_ent.path().join(RECORD_FILENAME);
                    if !record_path.is_file() {
                        continue;
                    }

                    match Self::read_record(&record_path) {
                        Ok(record) => records.push(record),
                        Err(e) => {
                            tracing::warn!(
                                "failed to load record: {} - {}",
                                record_path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        Ok(records)
    }
}

impl RecordStore for FileStore {
    fn insert(&self, record: PatientRecord) -> PatientResult<()> {
        let _guard = self.lock()?;

        if self.record_path(&record.id).exists() {
            return Err(PatientError::FileWrite(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("record {} already exists", record.id),
            )));
        }
        self.ensure_ehr_id_free(&record.ehr_id, &record.id)?;
        self.write_record(&record)
    }

    fn get(&self, id: &RecordId) -> PatientResult<Option<PatientRecord>> {
        let path = self.record_path(id);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read_record(&path).map(Some)
    }

    fn replace(&self, record: PatientRecord) -> PatientResult<()> {
        let _guard = self.lock()?;

        if !self.record_path(&record.id).is_file() {
            return Err(PatientError::NotFound(record.id.to_string()));
        }
        self.ensure_ehr_id_free(&record.ehr_id, &record.id)?;
        self.write_record(&record)
    }

    /// Records ordered by creation time, ties broken by id.
    fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        let mut records = self.scan()?;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    fn remove(&self, id: &RecordId) -> PatientResult<bool> {
        let _guard = self.lock()?;

        let record_dir = id.sharded_dir(&self.records_dir);
        if !record_dir.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&record_dir).map_err(PatientError::FileRemove)?;

        // Prune shard directories left empty; remove_dir refuses non-empty ones.
        for shard in record_dir.ancestors().skip(1).take(2) {
            if fs::remove_dir(shard).is_err() {
                break;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RECORDS_DIR_NAME;
    use crate::record::{Gender, PatientStatus, VitalSigns};
    use chrono::{Duration, NaiveDate, Utc};
    use ehr_types::NonEmptyText;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> FileStore {
        FileStore::open(temp_dir.path().join(RECORDS_DIR_NAME)).expect("open should succeed")
    }

    fn record(ehr_id: &str) -> PatientRecord {
        let now = Utc::now();
        PatientRecord {
            id: RecordId::new(),
            ehr_id: EhrId::new(ehr_id).unwrap(),
            patient_name: NonEmptyText::new("Test Patient").unwrap(),
            age: 52,
            gender: Gender::Male,
            dob: NaiveDate::from_ymd_opt(1974, 3, 9).unwrap(),
            status: PatientStatus::Recovering,
            medical_history: vec!["Type 2 diabetes".into()],
            medications: vec!["Metformin".into()],
            vital_signs: VitalSigns {
                blood_pressure: Some("130/85".into()),
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_writes_sharded_json_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        let r = record("EHR-100");

        store.insert(r.clone()).expect("insert should succeed");

        let path = r
            .id
            .sharded_dir(&temp_dir.path().join(RECORDS_DIR_NAME))
            .join(RECORD_FILENAME);
        assert!(path.is_file(), "record.json should exist");
        assert!(
            !path.with_extension(TEMP_SUFFIX).exists(),
            "temporary file should be renamed away"
        );

        let stored = store.get(&r.id).unwrap().expect("record should be readable");
        assert_eq!(stored, r);
    }

    #[test]
    fn test_get_unknown_id_returns_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        assert!(store.get(&RecordId::new()).unwrap().is_none());
    }

    #[test]
    fn test_insert_rejects_duplicate_ehr_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        store.insert(record("EHR-100")).unwrap();

        let err = store.insert(record("EHR-100")).expect_err("duplicate");
        assert!(matches!(err, PatientError::Conflict(_)));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_orders_by_created_at() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);

        let mut older = record("EHR-OLD");
        older.created_at = Utc::now() - Duration::days(2);
        let newer = record("EHR-NEW");

        store.insert(newer).unwrap();
        store.insert(older).unwrap();

        let ehr_ids: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.ehr_id.as_str().to_owned())
            .collect();
        assert_eq!(ehr_ids, vec!["EHR-OLD", "EHR-NEW"]);
    }

    #[test]
    fn test_list_skips_unparseable_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        store.insert(record("EHR-VALID")).unwrap();

        let bad_dir = RecordId::new().sharded_dir(store.records_dir());
        fs::create_dir_all(&bad_dir).unwrap();
        fs::write(bad_dir.join(RECORD_FILENAME), "{ not json").unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ehr_id.as_str(), "EHR-VALID");
    }

    #[test]
    fn test_replace_overwrites_and_checks_uniqueness() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        let mut first = record("EHR-1");
        store.insert(first.clone()).unwrap();
        store.insert(record("EHR-2")).unwrap();

        first.status = PatientStatus::Critical;
        store.replace(first.clone()).unwrap();
        assert_eq!(
            store.get(&first.id).unwrap().unwrap().status,
            PatientStatus::Critical
        );

        first.ehr_id = EhrId::new("EHR-2").unwrap();
        let err = store.replace(first).expect_err("taken ehrId");
        assert!(matches!(err, PatientError::Conflict(_)));
    }

    #[test]
    fn test_replace_missing_record_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        let err = store.replace(record("EHR-1")).expect_err("nothing stored");
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[test]
    fn test_remove_deletes_record_and_empty_shards() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir);
        let r = record("EHR-1");
        store.insert(r.clone()).unwrap();

        assert!(store.remove(&r.id).unwrap());
        assert!(!store.remove(&r.id).unwrap());
        assert!(store.get(&r.id).unwrap().is_none());

        let leftover = fs::read_dir(store.records_dir()).unwrap().count();
        assert_eq!(leftover, 0, "empty shard directories should be pruned");
    }
}
