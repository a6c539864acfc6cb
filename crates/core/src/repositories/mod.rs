//! Record persistence.
//!
//! [`RecordStore`] is the seam between [`crate::PatientService`] and whatever actually holds
//! the documents. Two backends ship with the crate:
//!
//! - [`memory::MemoryStore`] keeps records in process memory, in insertion order.
//! - [`file::FileStore`] keeps one JSON document per record in a sharded directory tree.
//!
//! Implementations own the `ehrId` uniqueness constraint: the duplicate check and the write
//! it guards must happen under the same lock, so that two concurrent creates with the same
//! `ehrId` cannot both succeed.

pub mod file;
pub mod memory;

use crate::error::PatientResult;
use crate::record::PatientRecord;
use ehr_uuid::RecordId;

pub trait RecordStore: Send + Sync {
    /// Persists a new record.
    ///
    /// # Errors
    ///
    /// [`crate::PatientError::Conflict`] if another record already uses the same `ehrId`.
    fn insert(&self, record: PatientRecord) -> PatientResult<()>;

    fn get(&self, id: &RecordId) -> PatientResult<Option<PatientRecord>>;

    /// Overwrites the stored record with the same id.
    ///
    /// # Errors
    ///
    /// [`crate::PatientError::NotFound`] if the record no longer exists, or
    /// [`crate::PatientError::Conflict`] if a *different* record already uses the new `ehrId`.
    fn replace(&self, record: PatientRecord) -> PatientResult<()>;

    /// All records in storage order.
    fn list(&self) -> PatientResult<Vec<PatientRecord>>;

    /// Removes a record. Returns `false` if there was nothing to remove.
    fn remove(&self, id: &RecordId) -> PatientResult<bool>;
}
