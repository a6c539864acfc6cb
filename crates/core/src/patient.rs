//! Patient service.
//!
//! [`PatientService`] is the create/read/update/delete contract over patient records. It
//! validates input, assigns identity and timestamps, and delegates persistence to an injected
//! [`RecordStore`].

use crate::error::{PatientError, PatientResult};
use crate::record::PatientRecord;
use crate::repositories::RecordStore;
use crate::validation::{validate_changes, validate_new, PatientFields};
use chrono::{DateTime, Utc};
use ehr_uuid::RecordId;
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn RecordStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Creates a new patient record.
    ///
    /// Validation and the `ehrId` uniqueness check both happen before anything is written.
    /// The returned record carries the server-assigned `id`, and `createdAt == updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - any required field is missing or any supplied field is invalid ([`PatientError::Validation`])
    /// - another record already has the same `ehrId` ([`PatientError::Conflict`])
    /// - the store fails to persist the record
    pub fn create(&self, fields: PatientFields) -> PatientResult<PatientRecord> {
        let new_patient = validate_new(fields)?;
        let record = new_patient.into_record(RecordId::new(), Utc::now());

        self.store.insert(record.clone())?;

        tracing::info!(id = %record.id, ehr_id = %record.ehr_id, "patient record created");
        Ok(record)
    }

    /// Merges the supplied fields into an existing record.
    ///
    /// Unsupplied fields keep their values. `updatedAt` is refreshed even when nothing else
    /// changes. The uniqueness check only bites when `ehrId` is changed to one already in use.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - no record has this id ([`PatientError::NotFound`])
    /// - a supplied field is invalid ([`PatientError::Validation`])
    /// - the new `ehrId` belongs to another record ([`PatientError::Conflict`])
    /// - the store fails to persist the record
    pub fn update(&self, id: &str, fields: PatientFields) -> PatientResult<PatientRecord> {
        let mut record = self.get(id)?;
        let changes = validate_changes(fields)?;

        changes.apply_to(&mut record);
        record.updated_at = next_updated_at(record.updated_at, Utc::now());

        self.store.replace(record.clone())?;

        tracing::info!(id = %record.id, status = %record.status, "patient record updated");
        Ok(record)
    }

    /// Fetches a single record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] for unknown or malformed ids.
    pub fn get(&self, id: &str) -> PatientResult<PatientRecord> {
        let record_id = parse_record_id(id)?;
        self.store
            .get(&record_id)?
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))
    }

    /// All records, in the store's order.
    pub fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        self.store.list()
    }

    /// Records whose name, identifiers, status, history or medications contain `term`
    /// (case-insensitive). A blank term returns everything.
    pub fn search(&self, term: &str) -> PatientResult<Vec<PatientRecord>> {
        let mut records = self.store.list()?;
        records.retain(|record| record.matches(term));
        Ok(records)
    }

    /// Permanently removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if there is no such record, including when it has
    /// already been deleted.
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let record_id = parse_record_id(id)?;
        if !self.store.remove(&record_id)? {
            return Err(PatientError::NotFound(id.to_owned()));
        }

        tracing::info!(id = %record_id, "patient record deleted");
        Ok(())
    }
}

/// An id that is not canonical cannot name any stored record.
fn parse_record_id(id: &str) -> PatientResult<RecordId> {
    RecordId::parse(id).map_err(|_| PatientError::NotFound(id.to_owned()))
}

/// `updatedAt` never moves backwards, even if the wall clock does.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous)
}
