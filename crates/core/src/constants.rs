//! Constants used throughout the EHR core crate.

/// Default directory for patient data storage when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Directory name, under the patient data directory, holding the record documents.
pub const RECORDS_DIR_NAME: &str = "records";

/// Filename of the JSON document for a single patient record.
pub const RECORD_FILENAME: &str = "record.json";

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";

/// Field names as they appear on the wire.
pub mod fields {
    pub const PATIENT_NAME: &str = "patientName";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const DOB: &str = "dob";
    pub const STATUS: &str = "status";
    pub const MEDICAL_HISTORY: &str = "medicalHistory";
    pub const MEDICATIONS: &str = "medications";
    pub const VITAL_SIGNS: &str = "vitalSigns";
    pub const EHR_ID: &str = "ehrId";

    /// Fields every create request must carry, in reporting order.
    pub const REQUIRED: [&str; 5] = [PATIENT_NAME, AGE, GENDER, DOB, EHR_ID];
}
