//! JSON bodies exchanged over the records API.
//!
//! Field names are camelCase on the wire. Request bodies reject unknown keys.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Vital-sign readings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VitalSigns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "120/80")]
    pub blood_pressure: Option<String>,
}

/// Patient fields for `POST /records` and `PUT /records/{id}`.
///
/// On create, `patientName`, `age`, `gender`, `dob` and `ehrId` are required. On update every
/// field is optional and only the supplied ones change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatientFieldsReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Jane Doe")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 34, minimum = 0)]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Female")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "1990-01-01")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Stable")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "EHR-001")]
    pub ehr_id: Option<String>,
}

/// A stored patient record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecordRes {
    #[schema(example = "550e8400e29b41d4a716446655440000")]
    pub id: String,
    pub ehr_id: String,
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub dob: NaiveDate,
    pub status: String,
    pub medical_history: Vec<String>,
    pub medications: Vec<String>,
    pub vital_signs: VitalSigns,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub problem: String,
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorRes>,
}

/// Query string for `GET /records`.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecordsQuery {
    /// Case-insensitive substring matched against name, ids, status, history and medications.
    pub q: Option<String>,
}
