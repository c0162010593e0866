// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # users-ingest
//!
//! A scheduled function that pulls user records from public HTTP APIs and
//! lands them as gzip batches on object storage, partitioned by day so a
//! crawler and catalog can query them.
//!
//! ## Variants
//!
//! - **single**: fetch `API_URL`, pass records through, write one wrapped
//!   JSON batch to `<prefix>/dt=YYYY/MM/DD/<HHMMSS>-<id>.json.gz`
//! - **multi**: fetch jsonplaceholder and randomuser, normalize both onto one
//!   record shape, write an NDJSON batch per source to
//!   `<prefix>/<source>/dt=YYYY/MM/DD/<HHMMSS>-<id>.ndjson.gz`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use users_ingest::{pipeline::Handler, Result, Variant};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Reads BUCKET and PREFIX (and API_URL for the single variant)
//!     let handler = Handler::from_env(Variant::Multi)?;
//!     let summary = handler.invoke(&serde_json::json!({})).await?;
//!     println!("{}", serde_json::to_string(&summary)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Handler::invoke(event) → Summary             │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────┬───┴──────────┬──────────┬─────────┐
//! │   Fetch   │  Normalize   │    Encode    │   Key    │  Write  │
//! ├───────────┼──────────────┼──────────────┼──────────┼─────────┤
//! │ GET → ok, │ jsonplace-   │ wrapped JSON │ dt=Y/M/D │ S3 PUT  │
//! │ status,   │ holder,      │ NDJSON       │ HHMMSS-  │ + type/ │
//! │ body      │ randomuser   │ gzip         │ uuid     │ gzip    │
//! └───────────┴──────────────┴──────────────┴──────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Environment configuration and source definitions
pub mod config;

/// Built-in source definitions
pub mod sources;

/// HTTP fetch step
pub mod http;

/// Per-source record normalizers
pub mod normalize;

/// Batch encoding, key generation and storage writes
pub mod output;

/// Invocation orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{IngestConfig, SourceDefinition};
pub use pipeline::{Handler, InvocationSummary};
