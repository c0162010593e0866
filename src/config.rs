//! Invocation configuration
//!
//! Required values come from the environment (`BUCKET`, `PREFIX`, and
//! `API_URL` for the single-source variant). A missing or blank value is an
//! error before any client is built; there are no defaults.

use crate::error::{Error, Result};
use crate::sources;
use crate::types::{SourceSchema, Variant};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Target bucket, plain name or `s3://` / `file://` URL
pub const ENV_BUCKET: &str = "BUCKET";
/// Key prefix for every batch
pub const ENV_PREFIX: &str = "PREFIX";
/// Endpoint for the single-source variant
pub const ENV_API_URL: &str = "API_URL";
/// `single` or `multi`
pub const ENV_VARIANT: &str = "INGEST_VARIANT";
/// YAML file replacing the built-in multi sources
pub const ENV_SOURCES_FILE: &str = "SOURCES_FILE";

// ============================================================================
// Source Definitions
// ============================================================================

/// One HTTP source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Source identifier, used in keys and the summary
    pub name: String,

    /// Endpoint fetched with an anonymous GET
    pub url: String,

    /// Payload shape, selecting the normalizer
    #[serde(default)]
    pub schema: SourceSchema,
}

impl SourceDefinition {
    /// Create a source definition
    pub fn new(name: impl Into<String>, url: impl Into<String>, schema: SourceSchema) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            schema,
        }
    }
}

/// Top-level layout of a sources YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceDefinition>,
}

impl SourcesFile {
    /// Parse and validate sources from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: SourcesFile = serde_yaml::from_str(yaml)?;
        file.validate()?;
        Ok(file)
    }

    /// Load sources from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read sources file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::invalid_value("sources", "at least one source is required"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(Error::invalid_value("sources.name", "source name is empty"));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(Error::invalid_value(
                    "sources.name",
                    format!("duplicate source '{}'", source.name),
                ));
            }
            Url::parse(&source.url)?;
        }
        Ok(())
    }
}

// ============================================================================
// Ingest Config
// ============================================================================

/// Everything one invocation needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Which variant to run
    pub variant: Variant,
    /// Target bucket
    pub bucket: String,
    /// Key prefix
    pub prefix: String,
    /// Sources fetched in order
    pub sources: Vec<SourceDefinition>,
}

impl IngestConfig {
    /// Read configuration from the process environment
    pub fn from_env(variant: Variant) -> Result<Self> {
        Self::from_lookup(variant, |key| std::env::var(key).ok())
    }

    /// Read configuration through a lookup function
    ///
    /// The single variant fetches `API_URL` and passes records through; the
    /// multi variant fetches the built-in sources.
    pub fn from_lookup<F>(variant: Variant, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = required(&lookup, ENV_BUCKET)?;
        let prefix = required(&lookup, ENV_PREFIX)?;
        let sources = Self::sources_from_lookup(variant, &lookup)?;

        Ok(Self {
            variant,
            bucket,
            prefix,
            sources,
        })
    }

    /// Sources a variant fetches, without the storage settings
    pub fn sources_from_env(variant: Variant) -> Result<Vec<SourceDefinition>> {
        Self::sources_from_lookup(variant, &|key: &str| std::env::var(key).ok())
    }

    /// Sources a variant fetches, read through a lookup function
    pub fn sources_from_lookup<F>(variant: Variant, lookup: &F) -> Result<Vec<SourceDefinition>>
    where
        F: Fn(&str) -> Option<String>,
    {
        match variant {
            Variant::Single => {
                let api_url = required(lookup, ENV_API_URL)?;
                Url::parse(&api_url)?;
                Ok(vec![SourceDefinition::new("api", api_url, SourceSchema::Raw)])
            }
            Variant::Multi => sources::builtin_sources(),
        }
    }

    /// Replace the multi-variant sources with those in a YAML file
    pub fn with_sources_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let file = SourcesFile::load(path)?;
        self.with_sources(file.sources)
    }

    /// Replace the multi-variant sources
    pub fn with_sources(mut self, sources: Vec<SourceDefinition>) -> Result<Self> {
        if self.variant == Variant::Single {
            return Err(Error::config(
                "the single variant reads its source from API_URL",
            ));
        }
        self.sources = sources;
        Ok(self)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::missing_field(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_single_variant_config() {
        let config = IngestConfig::from_lookup(
            Variant::Single,
            env(&[
                ("BUCKET", "raw-bucket"),
                ("PREFIX", "raw/users"),
                ("API_URL", "https://jsonplaceholder.typicode.com/users"),
            ]),
        )
        .unwrap();

        assert_eq!(config.bucket, "raw-bucket");
        assert_eq!(config.prefix, "raw/users");
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].schema, SourceSchema::Raw);
        assert_eq!(
            config.sources[0].url,
            "https://jsonplaceholder.typicode.com/users"
        );
    }

    #[test]
    fn test_multi_variant_uses_builtins() {
        let config = IngestConfig::from_lookup(
            Variant::Multi,
            env(&[("BUCKET", "raw-bucket"), ("PREFIX", "raw/users")]),
        )
        .unwrap();

        let names: Vec<_> = config.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["jsonplaceholder", "randomuser"]);
    }

    #[test]
    fn test_missing_bucket() {
        let err = IngestConfig::from_lookup(Variant::Multi, env(&[("PREFIX", "raw/users")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required config field: BUCKET");
    }

    #[test]
    fn test_blank_prefix_is_missing() {
        let err = IngestConfig::from_lookup(
            Variant::Multi,
            env(&[("BUCKET", "raw-bucket"), ("PREFIX", "  ")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "PREFIX"));
    }

    #[test]
    fn test_single_variant_requires_api_url() {
        let err = IngestConfig::from_lookup(
            Variant::Single,
            env(&[("BUCKET", "raw-bucket"), ("PREFIX", "raw/users")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "API_URL"));
    }

    #[test]
    fn test_single_variant_rejects_bad_url() {
        let err = IngestConfig::from_lookup(
            Variant::Single,
            env(&[
                ("BUCKET", "raw-bucket"),
                ("PREFIX", "raw/users"),
                ("API_URL", "not a url"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_sources_without_storage_settings() {
        let sources = IngestConfig::sources_from_lookup(
            Variant::Single,
            &env(&[("API_URL", "https://example.com/users")]),
        )
        .unwrap();
        assert_eq!(
            sources,
            vec![SourceDefinition::new("api", "https://example.com/users", SourceSchema::Raw)]
        );

        let sources = IngestConfig::sources_from_lookup(Variant::Multi, &env(&[])).unwrap();
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_sources_apply_api_url_rules() {
        let err = IngestConfig::sources_from_lookup(Variant::Single, &env(&[("API_URL", " ")]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "API_URL"));

        let err =
            IngestConfig::sources_from_lookup(Variant::Single, &env(&[("API_URL", "not a url")]))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_sources_file_from_yaml() {
        let file = SourcesFile::from_yaml(
            r"
sources:
  - name: people
    url: https://example.com/people
    schema: randomuser
  - name: dump
    url: https://example.com/dump
",
        )
        .unwrap();

        assert_eq!(file.sources.len(), 2);
        assert_eq!(file.sources[0].schema, SourceSchema::Randomuser);
        assert_eq!(file.sources[1].schema, SourceSchema::Raw);
    }

    #[test]
    fn test_sources_file_rejects_duplicates() {
        let err = SourcesFile::from_yaml(
            r"
sources:
  - name: a
    url: https://example.com/a
  - name: a
    url: https://example.com/b
",
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate source 'a'"));
    }

    #[test]
    fn test_sources_file_rejects_empty_list() {
        assert!(SourcesFile::from_yaml("sources: []").is_err());
    }

    #[test]
    fn test_sources_file_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yaml");
        std::fs::write(
            &path,
            "sources:\n  - name: only\n    url: https://example.com/only\n    schema: jsonplaceholder\n",
        )
        .unwrap();

        let config = IngestConfig::from_lookup(
            Variant::Multi,
            env(&[("BUCKET", "b"), ("PREFIX", "p")]),
        )
        .unwrap()
        .with_sources_file(&path)
        .unwrap();

        assert_eq!(
            config.sources,
            vec![SourceDefinition::new(
                "only",
                "https://example.com/only",
                SourceSchema::Jsonplaceholder
            )]
        );
    }

    #[test]
    fn test_single_variant_rejects_sources_override() {
        let config = IngestConfig::from_lookup(
            Variant::Single,
            env(&[
                ("BUCKET", "b"),
                ("PREFIX", "p"),
                ("API_URL", "https://example.com/users"),
            ]),
        )
        .unwrap();
        assert!(config.with_sources(vec![]).is_err());
    }
}
