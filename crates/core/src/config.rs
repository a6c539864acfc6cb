//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in request handling reads environment variables.

use crate::constants::RECORDS_DIR_NAME;
use crate::repositories::file::FileStore;
use crate::repositories::memory::MemoryStore;
use crate::repositories::RecordStore;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Which persistence backend to construct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// One JSON document per record under the patient data directory.
    #[default]
    File,
    /// Process memory only; contents are lost on exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(PatientError::InvalidInput(format!(
                "unknown store backend '{other}' (expected 'file' or 'memory')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
    store_backend: StoreBackend,
}

impl CoreConfig {
    pub fn new(patient_data_dir: PathBuf, store_backend: StoreBackend) -> Self {
        Self {
            patient_data_dir,
            store_backend,
        }
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    pub fn records_dir(&self) -> PathBuf {
        self.patient_data_dir.join(RECORDS_DIR_NAME)
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store_backend
    }

    /// Constructs the configured store.
    ///
    /// The file backend requires the patient data directory to exist already; a missing
    /// directory usually means a mis-mounted volume, and silently creating one would hide it.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if the patient data directory is missing, or a
    /// storage error if the records directory cannot be created.
    pub fn open_store(&self) -> PatientResult<Arc<dyn RecordStore>> {
        match self.store_backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::File => {
                if !self.patient_data_dir.is_dir() {
                    return Err(PatientError::InvalidInput(format!(
                        "patient data directory does not exist: {}",
                        self.patient_data_dir.display()
                    )));
                }
                Ok(Arc::new(FileStore::open(self.records_dir())?))
            }
        }
    }
}

/// Parse the store backend from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default (file) backend.
pub fn store_backend_from_env_value(value: Option<String>) -> PatientResult<StoreBackend> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<StoreBackend>())
        .transpose()
        .map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_backend_from_env_value() {
        assert_eq!(store_backend_from_env_value(None).unwrap(), StoreBackend::File);
        assert_eq!(
            store_backend_from_env_value(Some("  ".into())).unwrap(),
            StoreBackend::File
        );
        assert_eq!(
            store_backend_from_env_value(Some("Memory".into())).unwrap(),
            StoreBackend::Memory
        );
        assert!(matches!(
            store_backend_from_env_value(Some("mongo".into())),
            Err(PatientError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_open_store_requires_existing_data_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().join("missing"), StoreBackend::File);

        let err = cfg.open_store().err().expect("missing directory should fail");
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn test_open_file_store_creates_records_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf(), StoreBackend::File);

        let store = cfg.open_store().expect("open should succeed");
        assert!(cfg.records_dir().is_dir());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_ignores_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/definitely/not/here"), StoreBackend::Memory);
        assert!(cfg.open_store().is_ok());
    }
}
