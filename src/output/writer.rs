//! Object storage writer for compressed batches

use super::encode::encode_batch;
use crate::error::{Error, Result};
use crate::types::{BatchFormat, CONTENT_ENCODING_GZIP};
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of the write step for one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteResult {
    /// A batch was uploaded
    Written {
        ok: bool,
        bucket: String,
        key: String,
        count: usize,
    },
    /// Nothing to write; no storage call was made
    Skipped {
        ok: bool,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
}

impl WriteResult {
    /// Marker error for a batch with no records
    pub const EMPTY: &'static str = "empty";

    /// Result for an uploaded batch
    pub fn written(bucket: impl Into<String>, key: impl Into<String>, count: usize) -> Self {
        WriteResult::Written {
            ok: true,
            bucket: bucket.into(),
            key: key.into(),
            count,
        }
    }

    /// Marker for an empty batch, optionally naming its source
    pub fn empty(source: Option<&str>) -> Self {
        WriteResult::Skipped {
            ok: false,
            error: Self::EMPTY.to_string(),
            source: source.map(String::from),
        }
    }

    /// Whether a batch was written
    pub fn is_ok(&self) -> bool {
        match self {
            WriteResult::Written { ok, .. } | WriteResult::Skipped { ok, .. } => *ok,
        }
    }

    /// Key of the written object, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            WriteResult::Written { key, .. } => Some(key),
            WriteResult::Skipped { .. } => None,
        }
    }
}

/// Writes compressed batches to one bucket
#[derive(Debug, Clone)]
pub struct BatchWriter {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Bucket (or directory) reported in write results
    bucket: String,
    /// Key prefix inside the bucket, from `s3://bucket/<prefix>`
    base: String,
    /// Scheme for logging (s3, file, memory)
    scheme: String,
    /// Whether the store accepts content attributes
    store_attributes: bool,
}

impl BatchWriter {
    /// Wrap an existing store
    ///
    /// Used for injected stores such as `InMemory` in tests. Content
    /// attributes are always sent.
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            base: String::new(),
            scheme: "memory".to_string(),
            store_attributes: true,
        }
    }

    /// Build a writer from a `BUCKET` value
    ///
    /// Supported formats:
    /// - `my-bucket` or `s3://my-bucket[/base]` - AWS S3, credentials and
    ///   region from the standard `AWS_*` environment
    /// - `file:///local/dir` - local directory, for dry runs
    pub fn for_bucket(bucket: &str) -> Result<Self> {
        if let Some(path) = bucket.strip_prefix("file://") {
            Self::local(path)
        } else {
            Self::s3(bucket.strip_prefix("s3://").unwrap_or(bucket))
        }
    }

    fn s3(target: &str) -> Result<Self> {
        let (bucket, base) = match target.find('/') {
            Some(idx) => (&target[..idx], target[idx + 1..].trim_matches('/').to_string()),
            None => (target, String::new()),
        };
        if bucket.is_empty() {
            return Err(Error::invalid_value("BUCKET", "bucket name is empty"));
        }

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            base,
            scheme: "s3".to_string(),
            store_attributes: true,
        })
    }

    fn local(path: &str) -> Result<Self> {
        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: path.to_string(),
            base: String::new(),
            scheme: "file".to_string(),
            // The local filesystem has nowhere to keep content headers
            store_attributes: false,
        })
    }

    /// Bucket (or directory) this writer targets
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the scheme (s3, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    fn full_key(&self, key: &str) -> String {
        if self.base.is_empty() {
            key.to_string()
        } else {
            format!("{}/{key}", self.base)
        }
    }

    /// Encode, compress and upload a non-empty batch
    ///
    /// The object gets `Content-Type` for the format and
    /// `Content-Encoding: gzip`.
    pub async fn write<T: Serialize>(
        &self,
        key: &str,
        records: &[T],
        format: BatchFormat,
    ) -> Result<WriteResult> {
        if records.is_empty() {
            return Err(Error::output(format!("Refusing to write empty batch to {key}")));
        }

        let payload = encode_batch(records, format, Utc::now())?;
        // The store drops empty segments and percent-encodes reserved
        // characters; report the key it actually wrote
        let path = ObjectPath::from(self.full_key(key).as_str());
        let stored_key = path.to_string();
        debug!(
            "Uploading {} records ({} bytes) to {}://{}/{}",
            records.len(),
            payload.len(),
            self.scheme,
            self.bucket,
            stored_key
        );

        let mut opts = PutOptions::default();
        if self.store_attributes {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, format.content_type().into());
            attributes.insert(Attribute::ContentEncoding, CONTENT_ENCODING_GZIP.into());
            opts.attributes = attributes;
        }

        self.store
            .put_opts(&path, PutPayload::from(payload), opts)
            .await
            .map_err(|e| Error::storage(stored_key.clone(), e))?;

        info!(
            "Wrote {} records to {}://{}/{}",
            records.len(),
            self.scheme,
            self.bucket,
            stored_key
        );
        Ok(WriteResult::written(&self.bucket, stored_key, records.len()))
    }
}
