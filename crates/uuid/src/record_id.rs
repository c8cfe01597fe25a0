use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical record identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed the contained UUID is guaranteed to render in canonical form, so path
/// derivation is consistent everywhere a record is stored or looked up.
///
/// # Construction
/// - [`RecordId::new`] allocates a fresh identifier for a new record.
/// - [`RecordId::parse`] validates an externally supplied identifier (slug index entries,
///   commodity description references, CLI input).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "record id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is exactly 32 characters of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/`, where `s1`/`s2` are the first two pairs of hex
    /// characters of the identifier.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
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
    type Err = UuidError;

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
    use std::collections::HashSet;

    #[test]
    fn test_new_generates_canonical_id() {
        let id = RecordId::new();
        assert!(RecordId::is_canonical(&id.to_string()));
    }

    #[test]
    fn test_parse_valid_canonical_id() {
        let input = "550e8400e29b41d4a716446655440000";
        let id = RecordId::parse(input).expect("canonical id should parse");
        assert_eq!(id.to_string(), input);
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
            let err = RecordId::parse(input).expect_err("non-canonical id should be rejected");
            assert!(matches!(err, UuidError::InvalidInput(_)), "input: {input}");
        }
    }

    #[test]
    fn test_sharded_dir_structure() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let dir = id.sharded_dir(Path::new("/data/texts"));
        assert_eq!(
            dir,
            PathBuf::from("/data/texts/55/0e/550e8400e29b41d4a716446655440000")
        );
    }

    #[test]
    fn test_sharded_dir_creates_on_disk() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let id = RecordId::new();
        let dir = id.sharded_dir(temp_dir.path());
        std::fs::create_dir_all(&dir).expect("should create sharded dir");

        let canonical = id.to_string();
        assert!(temp_dir
            .path()
            .join(&canonical[0..2])
            .join(&canonical[2..4])
            .join(&canonical)
            .is_dir());
    }

    #[test]
    fn test_from_str_matches_parse() {
        let parsed: RecordId = "550e8400e29b41d4a716446655440000".parse().unwrap();
        assert_eq!(
            parsed,
            RecordId::parse("550e8400e29b41d4a716446655440000").unwrap()
        );
        assert!("not-an-id".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_new_ids_are_distinct() {
        let ids: HashSet<RecordId> = (0..64).map(|_| RecordId::new()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let err = serde_json::from_str::<RecordId>("\"550e8400-e29b-41d4-a716-446655440000\"");
        assert!(err.is_err());
    }
}
