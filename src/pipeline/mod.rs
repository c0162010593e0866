//! Invocation pipeline
//!
//! One pass per invocation: fetch every source, normalize the usable
//! bodies, then write each non-empty batch. Everything runs sequentially.
//!
//! # Overview
//!
//! - `Handler` - owns the config, HTTP client and batch writer
//! - `InvocationSummary` - per-source fetch and write outcomes
//!
//! A bad status or an empty body only produces an `{ok: false, error:
//! "empty"}` marker. Transport, decode and storage errors abort the whole
//! invocation.

mod types;

pub use types::{InvocationSummary, SourceOutcome};

use crate::config::{IngestConfig, SourceDefinition};
use crate::error::Result;
use crate::http::HttpClient;
use crate::normalize::{normalize_body, Records};
use crate::output::{generate_batch_key, BatchWriter, WriteResult};
use crate::types::{JsonValue, Variant};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs invocations against injected clients
#[derive(Debug)]
pub struct Handler {
    config: IngestConfig,
    client: HttpClient,
    writer: BatchWriter,
}

impl Handler {
    /// Create a handler from explicit parts
    pub fn new(config: IngestConfig, client: HttpClient, writer: BatchWriter) -> Self {
        Self {
            config,
            client,
            writer,
        }
    }

    /// Build the HTTP client and writer for a config
    pub fn from_config(config: IngestConfig) -> Result<Self> {
        let client = HttpClient::new()?;
        let writer = BatchWriter::for_bucket(&config.bucket)?;
        Ok(Self::new(config, client, writer))
    }

    /// Read config from the environment and build a handler
    pub fn from_env(variant: Variant) -> Result<Self> {
        Self::from_config(IngestConfig::from_env(variant)?)
    }

    /// Get the config
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Get the batch writer
    pub fn writer(&self) -> &BatchWriter {
        &self.writer
    }

    /// Run one invocation
    ///
    /// The trigger's event payload carries nothing the pipeline uses.
    pub async fn invoke(&self, event: &JsonValue) -> Result<InvocationSummary> {
        let start = Instant::now();
        debug!("Invocation event: {}", event);
        info!(
            "Starting {} ingestion of {} source(s)",
            self.config.variant,
            self.config.sources.len()
        );

        // Fetch all, normalize all, then write; a decode error aborts before any upload
        let mut fetched = Vec::with_capacity(self.config.sources.len());
        for source in &self.config.sources {
            let result = self.client.fetch(&source.url).await?;
            info!(
                "Fetched {}: status {} (ok={})",
                source.name, result.status, result.ok
            );
            fetched.push((source, result));
        }

        let mut normalized = Vec::with_capacity(fetched.len());
        for (source, result) in fetched {
            let records = match result.usable_body() {
                Some(body) => normalize_body(source.schema, body)?,
                None => Records::default(),
            };
            debug!("Normalized {} record(s) from {}", records.len(), source.name);
            normalized.push((source, result, records));
        }

        let mut outcomes = Vec::with_capacity(normalized.len());
        for (source, fetch, records) in normalized {
            let put = self.put(source, &records).await?;
            outcomes.push(SourceOutcome {
                name: source.name.clone(),
                fetch,
                put,
            });
        }

        let summary = self.summarize(outcomes);
        info!(
            "Ingestion finished: {} batch(es) written in {:?}",
            summary.written_batches(),
            start.elapsed()
        );
        Ok(summary)
    }

    /// Write one source's batch, or mark it empty without touching storage
    async fn put(&self, source: &SourceDefinition, records: &Records) -> Result<WriteResult> {
        let variant = self.config.variant;
        let source_tag = variant.keys_by_source().then_some(source.name.as_str());

        if records.is_empty() {
            warn!("No records from {}, skipping write", source.name);
            return Ok(WriteResult::empty(source_tag));
        }

        let format = variant.format();
        let key = generate_batch_key(&self.config.prefix, source_tag, format);
        match records {
            Records::Raw(rows) => self.writer.write(&key, rows, format).await,
            Records::Normalized(rows) => self.writer.write(&key, rows, format).await,
        }
    }

    fn summarize(&self, mut outcomes: Vec<SourceOutcome>) -> InvocationSummary {
        match self.config.variant {
            Variant::Single if outcomes.len() == 1 => {
                let outcome = outcomes.remove(0);
                InvocationSummary::Single {
                    fetch: outcome.fetch,
                    put: outcome.put,
                }
            }
            _ => InvocationSummary::multi(outcomes),
        }
    }
}
