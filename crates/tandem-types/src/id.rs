use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Unique identity for a record.
///
/// A `RecordId` is 128 bits of randomness (UUID v4), allocated once when a
/// record is created and immutable thereafter. Identity carries no temporal
/// component; `epoch` is the sort key. The same id addresses the record in
/// both backing stores: it is the blob-store key and the index document id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Allocate a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The canonical hyphenated form, used as the store key.
    pub fn as_key(&self) -> String {
        self.0.to_string()
    }

    /// Parse from the canonical hyphenated form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidRecordId(format!("{s}: {e}")))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
