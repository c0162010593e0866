// Allow common clippy pedantic lints
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

//! users-ingest CLI
//!
//! Runs the ingestion pipeline locally or under the Lambda runtime

use clap::Parser;
use users_ingest::cli::{log_filter, Cli, Commands, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let rust_log = std::env::var("RUST_LOG").ok();
    let subscriber =
        tracing_subscriber::fmt().with_env_filter(log_filter(rust_log.as_deref(), cli.verbose));
    if matches!(cli.command, Commands::Lambda) {
        // CloudWatch stamps each line and does not render colours
        subscriber.with_ansi(false).without_time().init();
    } else {
        subscriber.init();
    }

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
