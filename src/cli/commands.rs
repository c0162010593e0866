//! CLI commands and argument parsing

use crate::types::{BatchFormat, Variant};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scheduled ingestion of public user APIs into object storage
#[derive(Parser, Debug)]
#[command(name = "users-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ingestion variant
    #[arg(long, global = true, env = "INGEST_VARIANT", default_value = "multi")]
    pub variant: VariantArg,

    /// Sources file (YAML) replacing the built-in sources
    #[arg(short, long, global = true, env = "SOURCES_FILE")]
    pub sources: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one invocation now and print its summary
    Run {
        /// Inline event JSON (accepted and ignored, like a scheduler payload)
        #[arg(long)]
        event: Option<String>,

        /// Pretty-print the summary
        #[arg(long)]
        pretty: bool,
    },

    /// Serve scheduled invocations under the AWS Lambda runtime
    Lambda,

    /// List the sources the selected variant fetches
    Sources,

    /// Decode a batch file and print its records as NDJSON
    Inspect {
        /// Batch file (.json.gz or .ndjson.gz)
        path: PathBuf,

        /// Batch format (inferred from the file name when omitted)
        #[arg(short, long)]
        format: Option<FormatArg>,
    },
}

/// Ingestion variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VariantArg {
    /// One source from API_URL, wrapped JSON batch
    Single,
    /// Built-in normalized sources, NDJSON batch per source
    Multi,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Single => Variant::Single,
            VariantArg::Multi => Variant::Multi,
        }
    }
}

/// Batch format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    /// `{"ingested_at": ..., "records": [...]}`
    Json,
    /// Newline-delimited JSON
    Ndjson,
}

impl From<FormatArg> for BatchFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => BatchFormat::WrappedJson,
            FormatArg::Ndjson => BatchFormat::Ndjson,
        }
    }
}
