//! latpair - Cache Latency Log Pairer
//!
//! Joins the per-line integer latency measurements of a cached and a
//! non-cached benchmark run into a two-column CSV.
//!
//! # Usage
//!
//! ```bash
//! # Historical defaults: cached_latency + no_cache_latency -> latencies.csv
//! latpair
//!
//! # Multinode metadata-cache job
//! latpair --cached meta_cache_latency --noncached non_meta_cache_latency \
//!     --output meta_multinode_latencies.csv
//!
//! # Tolerate a shorter non-cached log
//! latpair --policy lenient
//!
//! # Print the CSV to stdout instead of a file
//! latpair --output -
//! ```
//!
//! # Environment Variables
//!
//! - `LATPAIR_CONFIG`: Path to a TOML config file (see the `config` module)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use latpair::{pair_files, PairConfig, PairPolicy};

#[derive(Parser, Debug)]
#[command(name = "latpair")]
#[command(about = "Pairs cached / non-cached latency logs into a CSV")]
#[command(version)]
struct CliArgs {
    /// Cached-run latency log (one integer per line)
    #[arg(long)]
    cached: Option<PathBuf>,

    /// Non-cached-run latency log (one integer per line)
    #[arg(long)]
    noncached: Option<PathBuf>,

    /// Output CSV path; use "-" for stdout. Overwritten on every run.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Out-of-range handling when the cached log has more samples
    #[arg(long, value_enum)]
    policy: Option<PairPolicy>,

    /// Explicit TOML config file (bypasses LATPAIR_CONFIG / ./latpair.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging. Diagnostics go to stderr so `--output -`
    // leaves stdout carrying only the CSV.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => PairConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PairConfig::load(),
    };

    // CLI flags win over every file layer.
    if let Some(cached) = args.cached {
        config.cached_log = cached;
    }
    if let Some(noncached) = args.noncached {
        config.noncached_log = noncached;
    }
    if let Some(output) = args.output {
        config.output_csv = output;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }

    config.validate()?;

    let report = pair_files(&config)?;
    if !config.writes_to_stdout() {
        info!(
            output = %config.output_csv.display(),
            rows = report.rows_written,
            "CSV written"
        );
    }

    Ok(())
}
