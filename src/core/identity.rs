//! Record identity - prefixed ULID identifiers

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Record type prefix (e.g., "EQP", "MR")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordPrefix {
    Equipment,
    Team,
    Category,
    Request,
    Comment,
}

impl RecordPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Equipment => "EQP",
            RecordPrefix::Team => "TEAM",
            RecordPrefix::Category => "CAT",
            RecordPrefix::Request => "MR",
            RecordPrefix::Comment => "CMT",
        }
    }
}

impl std::fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record identifier.
///
/// Generated ids are `PREFIX-ULID` (e.g., `MR-01J8B2K9QWERTY...`). Ids read
/// back from the store are kept verbatim - seeded or imported data may carry
/// any opaque string, and weak references resolve by equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh id for the given record type
    pub fn new(prefix: RecordPrefix) -> Self {
        Self(format!("{}-{}", prefix.as_str(), Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
