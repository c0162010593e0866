//! CLI module
//!
//! Command-line interface and function runtime entry point.
//!
//! # Commands
//!
//! - `run` - Run one invocation and print the summary
//! - `lambda` - Serve scheduled invocations under the Lambda runtime
//! - `sources` - List the sources the variant fetches
//! - `inspect` - Decode a written batch file

mod commands;
mod runner;

pub use commands::{Cli, Commands, FormatArg, VariantArg};
pub use runner::Runner;

use tracing_subscriber::EnvFilter;

/// Log filter for the binary
///
/// A valid, non-blank `RUST_LOG` wins. Otherwise the level is `debug` with
/// `--verbose` and `info` without.
pub fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}
