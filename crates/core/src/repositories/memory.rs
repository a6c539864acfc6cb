//! In-process record store.

use super::RecordStore;
use crate::error::{PatientError, PatientResult};
use crate::record::PatientRecord;
use ehr_uuid::RecordId;
use std::sync::RwLock;

/// Records held in memory, listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<PatientRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, record: PatientRecord) -> PatientResult<()> {
        let mut records = self.records.write().map_err(|_| PatientError::LockPoisoned)?;
        if records.iter().any(|r| r.ehr_id == record.ehr_id) {
            return Err(PatientError::Conflict(record.ehr_id));
        }
        records.push(record);
        Ok(())
    }

    fn get(&self, id: &RecordId) -> PatientResult<Option<PatientRecord>> {
        let records = self.records.read().map_err(|_| PatientError::LockPoisoned)?;
        Ok(records.iter().find(|r| r.id == *id).cloned())
    }

    fn replace(&self, record: PatientRecord) -> PatientResult<()> {
        let mut records = self.records.write().map_err(|_| PatientError::LockPoisoned)?;
        if records
            .iter()
            .any(|r| r.id != record.id && r.ehr_id == record.ehr_id)
        {
            return Err(PatientError::Conflict(record.ehr_id));
        }
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| PatientError::NotFound(record.id.to_string()))?;
        *slot = record;
        Ok(())
    }

    fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        let records = self.records.read().map_err(|_| PatientError::LockPoisoned)?;
        Ok(records.clone())
    }

    fn remove(&self, id: &RecordId) -> PatientResult<bool> {
        let mut records = self.records.write().map_err(|_| PatientError::LockPoisoned)?;
        let before = records.len();
        records.retain(|r| r.id != *id);
        Ok(records.len() != before)
    }
}
