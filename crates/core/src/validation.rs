//! Input validation for patient records.
//!
//! Every entry point (REST handlers, the CLI, [`crate::PatientService`]) funnels request data
//! through [`PatientFields`] and the two routines here, so the rules live in one place:
//!
//! - [`validate_new`] for creation: required fields must be present and valid, optional
//!   fields get their defaults.
//! - [`validate_changes`] for partial updates: only supplied fields are checked, each with the
//!   same per-field rule used on creation.
//!
//! A required text field that is absent, `null`, or blank counts as missing.

use crate::constants::fields;
use crate::record::{Gender, PatientRecord, PatientStatus, VitalSigns};
use chrono::{DateTime, NaiveDate, Utc};
use ehr_types::{EhrId, NonEmptyText};
use ehr_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unvalidated patient fields as supplied by a client.
///
/// Unknown keys are rejected at deserialisation, which also covers attempts to write the
/// server-managed `id`, `createdAt` and `updatedAt`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatientFields {
    pub patient_name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub status: Option<String>,
    pub medical_history: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub vital_signs: Option<VitalSigns>,
    pub ehr_id: Option<String>,
}

impl PatientFields {
    /// Names of the required fields that are absent, `null` or blank, in reporting order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|s| s.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.patient_name) {
            missing.push(fields::PATIENT_NAME);
        }
        if self.age.is_none() {
            missing.push(fields::AGE);
        }
        if blank(&self.gender) {
            missing.push(fields::GENDER);
        }
        if blank(&self.dob) {
            missing.push(fields::DOB);
        }
        if blank(&self.ehr_id) {
            missing.push(fields::EHR_ID);
        }
        missing
    }
}

/// What is wrong with one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: String,
}

/// Every problem found in one payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

const MISSING: &str = "is required";

impl ValidationErrors {
    pub fn missing(fields: &[&'static str]) -> Self {
        Self(
            fields
                .iter()
                .map(|&field| FieldError {
                    field,
                    problem: MISSING.into(),
                })
                .collect(),
        )
    }

    fn push(&mut self, field: &'static str, problem: impl Into<String>) {
        self.0.push(FieldError {
            field,
            problem: problem.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.0
            .iter()
            .filter(|e| e.problem == MISSING)
            .map(|e| e.field)
            .collect()
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        value().ok_or(self)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing = self.missing_fields();
        let invalid: Vec<String> = self
            .0
            .iter()
            .filter(|e| e.problem != MISSING)
            .map(|e| format!("{} {}", e.field, e.problem))
            .collect();

        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing required fields: {}", missing.join(", ")));
        }
        if !invalid.is_empty() {
            parts.push(format!("invalid fields: {}", invalid.join("; ")));
        }
        if parts.is_empty() {
            return f.write_str("validation failed");
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A fully validated creation payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPatient {
    pub patient_name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub status: PatientStatus,
    pub medical_history: Vec<String>,
    pub medications: Vec<String>,
    pub vital_signs: VitalSigns,
    pub ehr_id: EhrId,
}

impl NewPatient {
    /// Builds the stored record. Both timestamps are set to `now`.
    pub fn into_record(self, id: RecordId, now: DateTime<Utc>) -> PatientRecord {
        PatientRecord {
            id,
            ehr_id: self.ehr_id,
            patient_name: self.patient_name,
            age: self.age,
            gender: self.gender,
            dob: self.dob,
            status: self.status,
            medical_history: self.medical_history,
            medications: self.medications,
            vital_signs: self.vital_signs,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated partial update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientChanges {
    pub patient_name: Option<NonEmptyText>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub status: Option<PatientStatus>,
    pub medical_history: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub vital_signs: Option<VitalSigns>,
    pub ehr_id: Option<EhrId>,
}

impl PatientChanges {
    /// Merges the supplied fields into `record`. Timestamps are the caller's concern.
    pub fn apply_to(self, record: &mut PatientRecord) {
        if let Some(v) = self.patient_name {
            record.patient_name = v;
        }
        if let Some(v) = self.age {
            record.age = v;
        }
        if let Some(v) = self.gender {
            record.gender = v;
        }
        if let Some(v) = self.dob {
            record.dob = v;
        }
        if let Some(v) = self.status {
            record.status = v;
        }
        if let Some(v) = self.medical_history {
            record.medical_history = v;
        }
        if let Some(v) = self.medications {
            record.medications = v;
        }
        if let Some(v) = self.vital_signs {
            record.vital_signs = v;
        }
        if let Some(v) = self.ehr_id {
            record.ehr_id = v;
        }
    }
}

/// Validates a creation payload, collecting every problem before giving up.
///
/// # Errors
///
/// Returns [`ValidationErrors`] naming every missing required field and every invalid field.
pub fn validate_new(input: PatientFields) -> Result<NewPatient, ValidationErrors> {
    let mut errors = ValidationErrors::missing(&input.missing_required());

    let present = |value: Option<String>| value.filter(|s| !s.trim().is_empty());

    let patient_name = check(&mut errors, fields::PATIENT_NAME, present(input.patient_name), parse_name);
    let age = check(&mut errors, fields::AGE, input.age, parse_age);
    let gender = check(&mut errors, fields::GENDER, present(input.gender), parse_gender);
    let dob = check(&mut errors, fields::DOB, present(input.dob), parse_dob);
    let ehr_id = check(&mut errors, fields::EHR_ID, present(input.ehr_id), parse_ehr_id);
    let status = check(&mut errors, fields::STATUS, input.status, parse_status);

    errors.into_result(|| {
        Some(NewPatient {
            patient_name: patient_name?,
            age: age?,
            gender: gender?,
            dob: dob?,
            status: status.unwrap_or_default(),
            medical_history: input.medical_history.map(clean_entries).unwrap_or_default(),
            medications: input.medications.map(clean_entries).unwrap_or_default(),
            vital_signs: input.vital_signs.map(VitalSigns::normalised).unwrap_or_default(),
            ehr_id: ehr_id?,
        })
    })
}

/// Validates a partial update. Only supplied fields are checked.
///
/// # Errors
///
/// Returns [`ValidationErrors`] naming every supplied field that is invalid. Supplying a
/// required text field as blank is invalid rather than "unchanged".
pub fn validate_changes(input: PatientFields) -> Result<PatientChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let patient_name = check(&mut errors, fields::PATIENT_NAME, input.patient_name, parse_name);
    let age = check(&mut errors, fields::AGE, input.age, parse_age);
    let gender = check(&mut errors, fields::GENDER, input.gender, parse_gender);
    let dob = check(&mut errors, fields::DOB, input.dob, parse_dob);
    let status = check(&mut errors, fields::STATUS, input.status, parse_status);
    let ehr_id = check(&mut errors, fields::EHR_ID, input.ehr_id, parse_ehr_id);

    errors.into_result(|| {
        Some(PatientChanges {
            patient_name,
            age,
            gender,
            dob,
            status,
            medical_history: input.medical_history.map(clean_entries),
            medications: input.medications.map(clean_entries),
            vital_signs: input.vital_signs.map(VitalSigns::normalised),
            ehr_id,
        })
    })
}

fn check<R, T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<R>,
    parse: impl FnOnce(R) -> Result<T, String>,
) -> Option<T> {
    match parse(value?) {
        Ok(parsed) => Some(parsed),
        Err(problem) => {
            errors.push(field, problem);
            None
        }
    }
}

fn parse_name(value: String) -> Result<NonEmptyText, String> {
    NonEmptyText::new(value).map_err(|e| e.to_string())
}

fn parse_ehr_id(value: String) -> Result<EhrId, String> {
    EhrId::new(value).map_err(|e| e.to_string())
}

fn parse_age(value: i64) -> Result<u32, String> {
    if value < 0 {
        return Err("must not be negative".into());
    }
    u32::try_from(value).map_err(|_| "is out of range".into())
}

fn parse_gender(value: String) -> Result<Gender, String> {
    value.trim().parse()
}

fn parse_status(value: String) -> Result<PatientStatus, String> {
    value.trim().parse()
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 date-time whose UTC date is kept.
fn parse_dob(value: String) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| "must be a date in YYYY-MM-DD format".into())
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_owned())
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane_doe() -> PatientFields {
        PatientFields {
            patient_name: Some("Jane Doe".into()),
            age: Some(34),
            gender: Some("Female".into()),
            dob: Some("1990-01-01".into()),
            ehr_id: Some("EHR-001".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_new_applies_defaults() {
        let patient = validate_new(jane_doe()).expect("valid payload");

        assert_eq!(patient.patient_name.as_str(), "Jane Doe");
        assert_eq!(patient.age, 34);
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.dob, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(patient.status, PatientStatus::Stable);
        assert!(patient.medical_history.is_empty());
        assert!(patient.medications.is_empty());
        assert_eq!(patient.vital_signs, VitalSigns::default());
        assert_eq!(patient.ehr_id.as_str(), "EHR-001");
    }

    #[test]
    fn test_validate_new_names_every_missing_field() {
        let err = validate_new(PatientFields::default()).expect_err("empty payload");
        assert_eq!(
            err.missing_fields(),
            vec!["patientName", "age", "gender", "dob", "ehrId"]
        );
        assert_eq!(
            err.to_string(),
            "missing required fields: patientName, age, gender, dob, ehrId"
        );
    }

    #[test]
    fn test_validate_new_treats_blank_text_as_missing() {
        let mut fields = jane_doe();
        fields.patient_name = Some("   ".into());
        fields.ehr_id = Some(String::new());

        let err = validate_new(fields).expect_err("blank fields");
        assert_eq!(err.missing_fields(), vec!["patientName", "ehrId"]);
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_validate_new_accepts_age_zero() {
        let mut fields = jane_doe();
        fields.age = Some(0);
        assert_eq!(validate_new(fields).unwrap().age, 0);
    }

    #[test]
    fn test_validate_new_reports_missing_and_invalid_together() {
        let mut fields = jane_doe();
        fields.age = Some(-1);
        fields.status = Some("Deceased".into());
        fields.gender = None;

        let err = validate_new(fields).expect_err("invalid payload");
        let problems: Vec<_> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(problems, vec!["gender", "age", "status"]);
        assert_eq!(
            err.to_string(),
            "missing required fields: gender; invalid fields: age must not be negative; \
             status must be one of Stable, Critical, Recovering"
        );
    }

    #[test]
    fn test_validate_new_rejects_bad_dob_and_gender() {
        let mut fields = jane_doe();
        fields.dob = Some("01/01/1990".into());
        fields.gender = Some("female".into());

        let err = validate_new(fields).expect_err("invalid payload");
        assert_eq!(err.errors().len(), 2);
        assert!(err.missing_fields().is_empty());
    }

    #[test]
    fn test_validate_new_accepts_rfc3339_dob() {
        let mut fields = jane_doe();
        fields.dob = Some("1990-01-01T00:00:00.000Z".into());
        assert_eq!(
            validate_new(fields).unwrap().dob,
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_validate_new_cleans_list_entries() {
        let mut fields = jane_doe();
        fields.medical_history = Some(vec![" Asthma ".into(), "".into(), "  ".into()]);
        fields.vital_signs = Some(VitalSigns {
            blood_pressure: Some("  ".into()),
        });

        let patient = validate_new(fields).unwrap();
        assert_eq!(patient.medical_history, vec!["Asthma".to_string()]);
        assert_eq!(patient.vital_signs.blood_pressure, None);
    }

    #[test]
    fn test_validate_changes_only_touches_supplied_fields() {
        let changes = validate_changes(PatientFields {
            status: Some("Critical".into()),
            ..Default::default()
        })
        .expect("valid change");

        assert_eq!(
            changes,
            PatientChanges {
                status: Some(PatientStatus::Critical),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_validate_changes_rejects_blank_required_text() {
        let err = validate_changes(PatientFields {
            patient_name: Some(" ".into()),
            ..Default::default()
        })
        .expect_err("blank name");

        assert_eq!(err.errors()[0].field, "patientName");
        assert_eq!(err.errors()[0].problem, "must not be blank");
    }

    #[test]
    fn test_validate_changes_rejects_negative_age() {
        let err = validate_changes(PatientFields {
            age: Some(-5),
            ..Default::default()
        })
        .expect_err("negative age");
        assert_eq!(err.to_string(), "invalid fields: age must not be negative");
    }

    #[test]
    fn test_fields_reject_unknown_and_server_managed_keys() {
        let unknown = serde_json::from_str::<PatientFields>(r#"{"name":"Jane"}"#);
        assert!(unknown.is_err());
        let managed = serde_json::from_str::<PatientFields>(r#"{"createdAt":"2026-01-01"}"#);
        assert!(managed.is_err());
    }

    #[test]
    fn test_missing_required_on_partial_json() {
        let fields: PatientFields =
            serde_json::from_str(r#"{"patientName":"Jane","age":null,"gender":"Female"}"#)
                .unwrap();
        assert_eq!(fields.missing_required(), vec!["age", "dob", "ehrId"]);
    }
}
