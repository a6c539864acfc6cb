//! The patient record schema.
//!
//! [`PatientRecord`] is both the stored document and the API response body; its serde
//! representation is the canonical JSON shape:
//!
//! ```text
//! { id, ehrId, patientName, age, gender, dob, status,
//!   medicalHistory: [string], medications: [string], vitalSigns, createdAt, updatedAt }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use ehr_types::{EhrId, NonEmptyText};
use ehr_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clinical status of a patient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    #[default]
    Stable,
    Critical,
    Recovering,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 3] = [
        PatientStatus::Stable,
        PatientStatus::Critical,
        PatientStatus::Recovering,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Stable => "Stable",
            PatientStatus::Critical => "Critical",
            PatientStatus::Recovering => "Recovering",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = String;

    /// Exact, case-sensitive match against the enumerated values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("must be one of {}", join_names(&PatientStatus::ALL)))
    }
}

/// Administrative gender as captured by the intake forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| format!("must be one of {}", join_names(&Gender::ALL)))
    }
}

fn join_names<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Most recent vital-sign observations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VitalSigns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
}

impl VitalSigns {
    /// Trims readings and drops blank ones.
    pub(crate) fn normalised(self) -> Self {
        Self {
            blood_pressure: self
                .blood_pressure
                .map(|bp| bp.trim().to_owned())
                .filter(|bp| !bp.is_empty()),
        }
    }
}

/// A stored patient record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: RecordId,
    pub ehr_id: EhrId,
    pub patient_name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub status: PatientStatus,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub vital_signs: VitalSigns,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRecord {
    /// Naive case-insensitive substring match used for list filtering.
    ///
    /// Looks at the name, both identifiers, the status, and every history and medication
    /// entry. A blank term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&term);

        hit(self.patient_name.as_str())
            || hit(&self.id.to_string())
            || hit(self.ehr_id.as_str())
            || hit(self.status.as_str())
            || self.medical_history.iter().any(|item| hit(item))
            || self.medications.iter().any(|item| hit(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> PatientRecord {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        PatientRecord {
            id: RecordId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            ehr_id: EhrId::new("EHR-001").unwrap(),
            patient_name: NonEmptyText::new("Jane Doe").unwrap(),
            age: 34,
            gender: Gender::Female,
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            status: PatientStatus::Stable,
            medical_history: vec!["Hypertension".into()],
            medications: vec!["Lisinopril".into()],
            vital_signs: VitalSigns::default(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!("Critical".parse::<PatientStatus>(), Ok(PatientStatus::Critical));
        let err = "critical".parse::<PatientStatus>().unwrap_err();
        assert_eq!(err, "must be one of Stable, Critical, Recovering");
    }

    #[test]
    fn test_gender_rejects_unknown_value() {
        assert_eq!("Other".parse::<Gender>(), Ok(Gender::Other));
        assert!("Unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn test_record_serializes_camel_case_shape() {
        let json = serde_json::to_value(sample_record()).unwrap();

        assert_eq!(json["id"], "550e8400e29b41d4a716446655440000");
        assert_eq!(json["ehrId"], "EHR-001");
        assert_eq!(json["patientName"], "Jane Doe");
        assert_eq!(json["age"], 34);
        assert_eq!(json["gender"], "Female");
        assert_eq!(json["dob"], "1990-01-01");
        assert_eq!(json["status"], "Stable");
        assert_eq!(json["medicalHistory"][0], "Hypertension");
        assert_eq!(json["vitalSigns"], serde_json::json!({}));
        assert_eq!(json["createdAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["createdAt"], json["updatedAt"]);
    }

    #[test]
    fn test_matches_is_case_insensitive_across_fields() {
        let record = sample_record();
        assert!(record.matches("jane"));
        assert!(record.matches("ehr-00"));
        assert!(record.matches("STABLE"));
        assert!(record.matches("hyperten"));
        assert!(record.matches("lisino"));
        assert!(record.matches("550e84"));
        assert!(record.matches("  "));
        assert!(!record.matches("diabetes"));
    }
}
