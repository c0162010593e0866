//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FormatArg};
use crate::config::{IngestConfig, SourcesFile};
use crate::error::{Error, Result, ResultExt};
use crate::output::decode_batch;
use crate::pipeline::Handler;
use crate::types::{BatchFormat, JsonValue, Variant};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::json;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { event, pretty } => self.run_once(event.as_deref(), *pretty).await,
            Commands::Lambda => self.serve_lambda().await,
            Commands::Sources => self.list_sources(),
            Commands::Inspect { path, format } => self.inspect(path, *format),
        }
    }

    fn variant(&self) -> Variant {
        self.cli.variant.into()
    }

    /// Load config from the environment, applying the sources override
    fn load_config(&self) -> Result<IngestConfig> {
        let config = IngestConfig::from_env(self.variant())?;
        match &self.cli.sources {
            Some(path) => config.with_sources_file(path),
            None => Ok(config),
        }
    }

    /// Run a single invocation and print the summary
    async fn run_once(&self, event: Option<&str>, pretty: bool) -> Result<()> {
        let event: JsonValue = match event {
            Some(raw) => serde_json::from_str(raw)?,
            None => json!({}),
        };

        let handler = Handler::from_config(self.load_config()?)?;
        info!(
            "Writing to {}://{}",
            handler.writer().scheme(),
            handler.writer().bucket()
        );
        let summary = handler.invoke(&event).await?;

        let output = if pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };
        println!("{output}");
        Ok(())
    }

    /// Hand invocations to the Lambda runtime until it shuts down
    async fn serve_lambda(&self) -> Result<()> {
        let handler = Handler::from_config(self.load_config()?)?;
        info!(
            "Serving {} ingestion for {} source(s)",
            handler.config().variant,
            handler.config().sources.len()
        );

        let handler = &handler;
        lambda_runtime::run(service_fn(move |event: LambdaEvent<JsonValue>| async move {
            handler
                .invoke(&event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }))
        .await
        .map_err(|e| Error::Other(format!("Lambda runtime failed: {e}")))
    }

    /// Print the effective sources, one JSON object per line
    fn list_sources(&self) -> Result<()> {
        let sources = match (self.variant(), &self.cli.sources) {
            (Variant::Multi, Some(path)) => SourcesFile::load(path)?.sources,
            (Variant::Single, Some(_)) => {
                return Err(Error::config(
                    "the single variant reads its source from API_URL",
                ))
            }
            (variant, None) => IngestConfig::sources_from_env(variant)?,
        };

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for source in &sources {
            writeln!(out, "{}", serde_json::to_string(source)?)?;
        }
        Ok(())
    }

    /// Decode a batch file and print its records
    fn inspect(&self, path: &Path, format: Option<FormatArg>) -> Result<()> {
        let format = match format {
            Some(format) => format.into(),
            None => BatchFormat::from_path(&path.to_string_lossy()).ok_or_else(|| {
                Error::config(format!(
                    "Cannot infer batch format of {}; pass --format",
                    path.display()
                ))
            })?,
        };

        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let batch = decode_batch(&bytes, format)?;
        if let Some(ref at) = batch.ingested_at {
            info!("Batch ingested at {}", at);
        }
        info!("{} record(s) in {}", batch.records.len(), path.display());

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for record in &batch.records {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        }
        Ok(())
    }
}
