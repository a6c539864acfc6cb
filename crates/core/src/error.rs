use crate::validation::ValidationErrors;
use ehr_types::EhrId;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("a patient record with ehrId '{0}' already exists")]
    Conflict(EhrId),
    #[error("patient record not found: {0}")]
    NotFound(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove record: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
    #[error("record store lock poisoned")]
    LockPoisoned,
}

impl PatientError {
    /// True for failures of the persistence backend rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            PatientError::StorageDirCreation(_)
                | PatientError::FileWrite(_)
                | PatientError::FileRead(_)
                | PatientError::FileRemove(_)
                | PatientError::Serialization(_)
                | PatientError::Deserialization(_)
                | PatientError::LockPoisoned
        )
    }
}

impl From<ValidationErrors> for PatientError {
    fn from(errors: ValidationErrors) -> Self {
        PatientError::Validation(errors)
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
