//! # EHR Core
//!
//! Core business logic for the EHR patient record system.
//!
//! This crate contains the patient record schema and its CRUD contract:
//! - The record model ([`PatientRecord`]) and its enumerations
//! - One validation routine shared by every entry point ([`validation`])
//! - The persistence seam ([`RecordStore`]) with in-memory and file-backed implementations
//! - [`PatientService`], which ties validation, identity, timestamps and storage together
//!
//! **No API concerns**: HTTP servers and wire-level error mapping belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod record;
pub mod repositories;
pub mod validation;

pub use config::{store_backend_from_env_value, CoreConfig, StoreBackend};
pub use constants::{DEFAULT_PATIENT_DATA_DIR, DEFAULT_REST_ADDR};
pub use error::{PatientError, PatientResult};
pub use patient::PatientService;
pub use record::{Gender, PatientRecord, PatientStatus, VitalSigns};
pub use repositories::{file::FileStore, memory::MemoryStore, RecordStore};
pub use validation::{FieldError, PatientFields, ValidationErrors};

pub use ehr_types::{EhrId, NonEmptyText, TextError};
pub use ehr_uuid::RecordId;
