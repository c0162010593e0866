//! Common types used throughout users-ingest
//!
//! Shared enums and type aliases used by the fetch, normalize, output and
//! pipeline modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Variant
// ============================================================================

/// Which ingestion flavour an invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// One source from `API_URL`, raw records, wrapped JSON batch
    Single,
    /// Built-in normalized sources, one NDJSON batch per source
    #[default]
    Multi,
}

impl Variant {
    /// Batch encoding used by this variant
    pub fn format(self) -> BatchFormat {
        match self {
            Variant::Single => BatchFormat::WrappedJson,
            Variant::Multi => BatchFormat::Ndjson,
        }
    }

    /// Whether keys carry a per-source path segment
    pub fn keys_by_source(self) -> bool {
        matches!(self, Variant::Multi)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Single => write!(f, "single"),
            Variant::Multi => write!(f, "multi"),
        }
    }
}

// ============================================================================
// Source Schema
// ============================================================================

/// Shape of a source's response body, selecting its normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSchema {
    /// Records are passed through untouched
    #[default]
    Raw,
    /// Flat user objects with nested `company` and `address`
    Jsonplaceholder,
    /// `{results: [...]}` envelope with nested `login`, `name` and `location`
    Randomuser,
}

// ============================================================================
// Batch Format
// ============================================================================

/// On-storage encoding of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFormat {
    /// `{"ingested_at": ..., "records": [...]}`
    #[default]
    WrappedJson,
    /// One compact JSON record per line
    Ndjson,
}

impl BatchFormat {
    /// File extension before the `.gz` suffix
    pub fn extension(self) -> &'static str {
        match self {
            BatchFormat::WrappedJson => "json",
            BatchFormat::Ndjson => "ndjson",
        }
    }

    /// `Content-Type` stored with the object
    pub fn content_type(self) -> &'static str {
        match self {
            BatchFormat::WrappedJson => "application/json",
            BatchFormat::Ndjson => "application/x-ndjson",
        }
    }

    /// Guess the format from an object key or file name
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".ndjson.gz") || path.ends_with(".ndjson") {
            Some(BatchFormat::Ndjson)
        } else if path.ends_with(".json.gz") || path.ends_with(".json") {
            Some(BatchFormat::WrappedJson)
        } else {
            None
        }
    }
}

/// `Content-Encoding` stored with every batch
pub const CONTENT_ENCODING_GZIP: &str = "gzip";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_format() {
        assert_eq!(Variant::Single.format(), BatchFormat::WrappedJson);
        assert_eq!(Variant::Multi.format(), BatchFormat::Ndjson);
        assert!(Variant::Multi.keys_by_source());
        assert!(!Variant::Single.keys_by_source());
    }

    #[test]
    fn test_batch_format_metadata() {
        assert_eq!(BatchFormat::WrappedJson.extension(), "json");
        assert_eq!(BatchFormat::Ndjson.extension(), "ndjson");
        assert_eq!(BatchFormat::WrappedJson.content_type(), "application/json");
        assert_eq!(BatchFormat::Ndjson.content_type(), "application/x-ndjson");
    }

    #[test]
    fn test_batch_format_from_path() {
        assert_eq!(
            BatchFormat::from_path("raw/users/dt=2025/01/02/000000-ab.ndjson.gz"),
            Some(BatchFormat::Ndjson)
        );
        assert_eq!(
            BatchFormat::from_path("raw/users/dt=2025/01/02/000000-ab.json.gz"),
            Some(BatchFormat::WrappedJson)
        );
        assert_eq!(BatchFormat::from_path("notes.txt"), None);
    }

    #[test]
    fn test_source_schema_serde() {
        let schema: SourceSchema = serde_json::from_str("\"randomuser\"").unwrap();
        assert_eq!(schema, SourceSchema::Randomuser);
        let variant: Variant = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(variant, Variant::Single);
    }
}
