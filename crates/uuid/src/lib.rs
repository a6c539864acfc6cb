//! Record identifiers and sharded-path utilities.
//!
//! Every patient record gets a server-assigned identifier, separate from the client-supplied
//! `ehrId`. The identifier has one canonical textual form: **32 lowercase hexadecimal
//! characters** (no hyphens), e.g. `550e8400e29b41d4a716446655440000`. This is what the API
//! returns in `id` and what it expects back in `/records/{id}`.
//!
//! The file-backed store lays records out under
//! `parent_dir/<id[0..2]>/<id[2..4]>/<id>/` so that no single directory grows unbounded.

use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

pub use ::uuid::Uuid;

/// Error type for record identifier parsing.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("record id must be 32 lowercase hex characters without hyphens, got: '{0}'")]
    NotCanonical(String),
}

pub type IdResult<T> = Result<T, IdError>;

/// Canonical record identifier.
///
/// Once constructed the contained UUID is known to be valid, and its `Display` output is
/// always the canonical simple form.
///
/// - [`RecordId::new`] allocates a fresh v4 identifier for a new record.
/// - [`RecordId::parse`] validates an externally supplied identifier. Hyphenated or uppercase
///   forms are rejected rather than normalised, so one record never has two spellings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::NotCanonical`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> IdResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdError::NotCanonical(input.to_owned()));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| IdError::NotCanonical(input.to_owned()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Purely syntactic check: exactly 32 bytes of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first two pairs of hex
    /// characters of the identifier.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_id() {
        let id = RecordId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 32);
        assert!(RecordId::is_canonical(&s));
    }

    #[test]
    fn test_parse_accepts_canonical() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").expect("should parse");
        assert_eq!(id.to_string(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn test_parse_rejects_non_canonical_forms() {
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a7164466554400000",
            "550e8400e29b41d4a71644665544000g",
            "",
        ] {
            assert!(
                matches!(RecordId::parse(input), Err(IdError::NotCanonical(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_sharded_dir_structure() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let dir = id.sharded_dir(Path::new("/data/records"));
        assert_eq!(
            dir,
            PathBuf::from("/data/records/55/0e/550e8400e29b41d4a716446655440000")
        );
    }

    #[test]
    fn test_from_str_matches_parse() {
        let id: RecordId = "0123456789abcdef0123456789abcdef".parse().unwrap();
        assert_eq!(id.to_string(), "0123456789abcdef0123456789abcdef");
        assert!("not-an-id".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let err = serde_json::from_str::<RecordId>("\"550e8400-e29b-41d4-a716-446655440000\"");
        assert!(err.is_err());
    }
}
