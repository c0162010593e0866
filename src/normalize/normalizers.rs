//! Normalizer implementations
//!
//! Each source gets a typed view of its payload and an explicit mapping
//! onto [`NormalizedRecord`].

use super::types::{lenient_string, NormalizedRecord, RecordNormalizer, Records};
use crate::error::{Error, Result};
use crate::types::{JsonValue, SourceSchema};
use serde::Deserialize;

/// Coerce a body into a list of records
///
/// Arrays yield their items, `null` or absent yields nothing, and any other
/// value is a single record.
pub fn to_list(value: Option<&JsonValue>) -> Vec<JsonValue> {
    match value {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

fn items(value: Option<&JsonValue>) -> &[JsonValue] {
    match value {
        None | Some(JsonValue::Null) => &[],
        Some(JsonValue::Array(items)) => items,
        Some(other) => std::slice::from_ref(other),
    }
}

fn parse_item<'a, T: Deserialize<'a>>(source: &str, item: &'a JsonValue) -> Result<T> {
    T::deserialize(item).map_err(|e| Error::normalize(source, e.to_string()))
}

// ============================================================================
// jsonplaceholder
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonplaceholderUser {
    id: Option<JsonValue>,
    name: Option<JsonValue>,
    username: Option<JsonValue>,
    email: Option<JsonValue>,
    phone: Option<JsonValue>,
    website: Option<JsonValue>,
    company: Option<JsonplaceholderCompany>,
    address: Option<JsonplaceholderAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonplaceholderCompany {
    name: Option<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonplaceholderAddress {
    city: Option<JsonValue>,
}

/// Normalizer for flat jsonplaceholder `/users` objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonplaceholderNormalizer;

impl JsonplaceholderNormalizer {
    const SOURCE: &'static str = "jsonplaceholder";

    fn map(user: JsonplaceholderUser) -> NormalizedRecord {
        let company = user.company.unwrap_or_default();
        let address = user.address.unwrap_or_default();

        NormalizedRecord {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            phone: user.phone,
            website: user.website,
            company: company.name,
            city: address.city,
            source: Self::SOURCE.to_string(),
        }
    }
}

impl RecordNormalizer for JsonplaceholderNormalizer {
    fn source(&self) -> &'static str {
        Self::SOURCE
    }

    fn normalize(&self, body: &JsonValue) -> Result<Vec<NormalizedRecord>> {
        items(Some(body))
            .iter()
            .map(|item| parse_item(self.source(), item).map(Self::map))
            .collect()
    }
}

// ============================================================================
// randomuser
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RandomuserUser {
    login: Option<RandomuserLogin>,
    name: Option<RandomuserName>,
    email: Option<JsonValue>,
    phone: Option<JsonValue>,
    location: Option<RandomuserLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RandomuserLogin {
    uuid: Option<JsonValue>,
    username: Option<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RandomuserName {
    #[serde(deserialize_with = "lenient_string")]
    first: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    last: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RandomuserLocation {
    city: Option<JsonValue>,
}

/// Normalizer for randomuser.me `{results: [...]}` payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomuserNormalizer;

impl RandomuserNormalizer {
    const SOURCE: &'static str = "randomuser";

    fn map(user: RandomuserUser) -> NormalizedRecord {
        let login = user.login.unwrap_or_default();
        let name = user.name.unwrap_or_default();
        let location = user.location.unwrap_or_default();

        // Space-joined, skipping missing and empty parts
        let full_name = [name.first, name.last]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        NormalizedRecord {
            id: login.uuid,
            name: Some(JsonValue::String(full_name)),
            username: login.username,
            email: user.email,
            phone: user.phone,
            website: None,
            company: None,
            city: location.city,
            source: Self::SOURCE.to_string(),
        }
    }
}

impl RecordNormalizer for RandomuserNormalizer {
    fn source(&self) -> &'static str {
        Self::SOURCE
    }

    fn normalize(&self, body: &JsonValue) -> Result<Vec<NormalizedRecord>> {
        let results = match body {
            JsonValue::Object(map) => map.get("results"),
            _ => None,
        };

        items(results)
            .iter()
            .map(|item| parse_item(self.source(), item).map(Self::map))
            .collect()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Normalizer for a schema, or `None` for raw pass-through
pub fn normalizer_for(schema: SourceSchema) -> Option<Box<dyn RecordNormalizer>> {
    match schema {
        SourceSchema::Raw => None,
        SourceSchema::Jsonplaceholder => Some(Box::new(JsonplaceholderNormalizer)),
        SourceSchema::Randomuser => Some(Box::new(RandomuserNormalizer)),
    }
}

/// Turn a fetched body into records according to its schema
pub fn normalize_body(schema: SourceSchema, body: &JsonValue) -> Result<Records> {
    match normalizer_for(schema) {
        Some(normalizer) => Ok(Records::Normalized(normalizer.normalize(body)?)),
        None => Ok(Records::Raw(to_list(Some(body)))),
    }
}
