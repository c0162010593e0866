//! Normalizer types and traits

use crate::error::Result;
use crate::types::JsonValue;
use serde::{Deserialize, Deserializer, Serialize};

/// Common flat record shape written by the multi-source variant
///
/// Field order here is the key order in every NDJSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Source identifier; numeric for jsonplaceholder, a UUID for randomuser
    pub id: Option<JsonValue>,
    pub name: Option<JsonValue>,
    pub username: Option<JsonValue>,
    pub email: Option<JsonValue>,
    pub phone: Option<JsonValue>,
    pub website: Option<JsonValue>,
    pub company: Option<JsonValue>,
    pub city: Option<JsonValue>,
    /// Name of the source that produced the record
    pub source: String,
}

/// Trait for per-source normalizers
pub trait RecordNormalizer: Send + Sync {
    /// Source tag written into every record
    fn source(&self) -> &'static str;

    /// Normalize a whole response body into records
    fn normalize(&self, body: &JsonValue) -> Result<Vec<NormalizedRecord>>;
}

/// Records ready for encoding, either passed through or normalized
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    /// Untouched source records
    Raw(Vec<JsonValue>),
    /// Records mapped onto the common shape
    Normalized(Vec<NormalizedRecord>),
}

impl Records {
    /// Number of records
    pub fn len(&self) -> usize {
        match self {
            Records::Raw(rows) => rows.len(),
            Records::Normalized(rows) => rows.len(),
        }
    }

    /// Whether there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Records {
    fn default() -> Self {
        Records::Raw(Vec::new())
    }
}

/// Deserialize a name part as an optional string
///
/// `null` and absent become `None`; numbers and booleans keep their JSON
/// text so they can still be joined.
pub(crate) fn lenient_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
