//! checktxstatus — find signed transactions that never landed on-chain.
//!
//! Usage:
//! ```bash
//! # Check two transaction files against an indexer
//! checktxstatus batch1.tx batch2.tx --idx-addr http://localhost:8980 --idx-tkn $TOKEN
//!
//! # Same, with the indexer taken from the environment
//! AF_IDX_ADDRESS=http://localhost:8980 checktxstatus batch1.tx --log-level DEBUG
//! ```
//!
//! For every input file, transactions the indexer does not know about are
//! written to `<file>.unsent`, ready to be submitted again.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chaintx_core::{Processor, ProcessorConfig};
use chaintx_indexer::{ConfigError, IndexerClient, IndexerConfig};
use clap::{CommandFactory, Parser};
use tracing::error;

mod logging;

use logging::{init_tracing, LogConfig};

#[derive(Parser, Debug)]
#[command(
    name = "checktxstatus",
    about = "CLI for checking if transactions are successfully submitted to the blockchain",
    long_about = "
Checks each signed transaction file against an indexer and writes the
transactions that are not on-chain to <file>.unsent. Atomic groups are kept
or dropped as a whole, judged by their first transaction.

ENVIRONMENT VARIABLES:
  AF_IDX_ADDRESS   Default for --idx-addr
  AF_IDX_TOKEN     Default for --idx-tkn
",
    version
)]
struct Cli {
    /// Signed transaction files to check
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Address of the indexer client
    #[arg(long = "idx-addr", env = "AF_IDX_ADDRESS")]
    idx_addr: Option<String>,

    /// API token of the indexer client
    #[arg(long = "idx-tkn", env = "AF_IDX_TOKEN", hide_env_values = true)]
    idx_tkn: Option<String>,

    /// Log level: INFO or DEBUG
    #[arg(long = "log-level", default_value = "INFO")]
    log_level: String,

    /// Emit JSON structured logs
    #[arg(long)]
    log_json: bool,

    /// Per-request indexer timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Maximum status lookups in flight per file (1 = sequential)
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Continue with the next file after a failure
    #[arg(long)]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&LogConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    run(cli).await
}

/// Everything after logging is up. Configuration and per-file failures are
/// logged and still return `Ok`, so the exit status stays 0.
async fn run(cli: Cli) -> Result<()> {
    let indexer = IndexerConfig {
        address: cli.idx_addr.unwrap_or_default(),
        token: cli.idx_tkn,
        request_timeout: Duration::from_secs(cli.timeout_secs),
    };
    let client = match IndexerClient::new(indexer) {
        Ok(client) => client,
        Err(ConfigError::MissingAddress) => {
            error!("please supply an indexer client address using --idx-addr flag or AF_IDX_ADDRESS environment variable");
            return Ok(());
        }
        Err(e) => {
            error!("{e}");
            return Ok(());
        }
    };

    if cli.files.is_empty() {
        error!("supply at least 1 transactions file");
        if let Err(e) = Cli::command().print_help() {
            error!(error = %e, "failed printing usage");
        }
    }

    let processor = Processor::new(
        client,
        ProcessorConfig {
            concurrency: cli.concurrency,
            keep_going: cli.keep_going,
        },
    );
    processor.run(&cli.files).await;

    Ok(())
}
