//! Latency Pairing & CSV Emission
//!
//! Pairs the i-th cached sample with the i-th non-cached sample and
//! writes the two-column CSV consumed by the latency plots. The cached
//! sequence governs the iteration bound; what happens when the
//! non-cached sequence runs out first is a policy choice, because the
//! benchmark runs are launched independently and do not always record
//! the same number of requests.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use crate::config::PairConfig;
use crate::sequence::{parse_sequence, LatencySample, LatencySequence};

/// Fixed CSV header. The space after the comma matches the historical
/// output; downstream consumers strip it.
pub const CSV_HEADER: &str = "cached, noncached";

/// Out-of-range handling when the cached log holds more samples than
/// the non-cached log.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PairPolicy {
    /// Fail on the first cached index with no non-cached partner.
    #[default]
    Strict,
    /// Stop emitting rows at the end of the non-cached sequence.
    Lenient,
}

/// Pairing errors.
#[derive(Debug, Error)]
pub enum PairError {
    #[error(
        "non-cached sequence exhausted at row {index}: cached log has {cached_len} samples, non-cached log has {noncached_len}"
    )]
    NonCachedExhausted {
        index: usize,
        cached_len: usize,
        noncached_len: usize,
    },

    #[error("CSV write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the header plus one `cached,noncached` row per pair.
///
/// Iterates over the cached sequence. When the non-cached sequence is
/// shorter, strict policy returns [`PairError::NonCachedExhausted`]
/// (rows already written stay written); lenient policy stops at the
/// boundary. Returns the number of data rows written.
pub fn write_pairs<W: Write>(
    out: &mut W,
    cached: &[LatencySample],
    noncached: &[LatencySample],
    policy: PairPolicy,
) -> Result<usize, PairError> {
    writeln!(out, "{CSV_HEADER}")?;

    let mut rows = 0usize;
    for (index, &cached_sample) in cached.iter().enumerate() {
        // Explicit bound check: the shorter non-cached sequence ends
        // the output (lenient) or the run (strict).
        if index >= noncached.len() {
            match policy {
                PairPolicy::Lenient => break,
                PairPolicy::Strict => {
                    return Err(PairError::NonCachedExhausted {
                        index,
                        cached_len: cached.len(),
                        noncached_len: noncached.len(),
                    })
                }
            }
        }

        writeln!(out, "{},{}", cached_sample, noncached[index])?;
        rows += 1;
    }

    Ok(rows)
}

/// Summary of one pairing run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PairReport {
    pub cached_samples: usize,
    pub cached_skipped: usize,
    pub noncached_samples: usize,
    pub noncached_skipped: usize,
    pub rows_written: usize,
    pub policy: PairPolicy,
}

/// Open and fully parse one latency log.
fn parse_log(path: &Path) -> Result<LatencySequence> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open latency log {}", path.display()))?;
    let sequence = parse_sequence(BufReader::new(file))
        .with_context(|| format!("Failed to read latency log {}", path.display()))?;

    info!(
        path = %path.display(),
        samples = sequence.len(),
        skipped = sequence.lines_skipped,
        "Parsed latency log"
    );
    Ok(sequence)
}

/// Run a full pairing job: parse both logs, then write the CSV.
///
/// Both inputs are fully consumed and dropped before the output is
/// created. The output is truncated on open, so reruns overwrite; a
/// strict-policy failure still leaves the rows emitted before the
/// mismatch on disk.
pub fn pair_files(config: &PairConfig) -> Result<PairReport> {
    let cached = parse_log(&config.cached_log)?;
    let noncached = parse_log(&config.noncached_log)?;

    let rows_written = if config.writes_to_stdout() {
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let rows = write_pairs(&mut out, &cached.samples, &noncached.samples, config.policy)
            .context("Failed to pair latency sequences")?;
        out.flush().context("Failed to flush CSV to stdout")?;
        rows
    } else {
        let file = File::create(&config.output_csv).with_context(|| {
            format!("Failed to create output CSV {}", config.output_csv.display())
        })?;
        let mut out = BufWriter::new(file);
        let rows = write_pairs(&mut out, &cached.samples, &noncached.samples, config.policy)
            .with_context(|| format!("Failed to write {}", config.output_csv.display()))?;
        out.flush()
            .with_context(|| format!("Failed to flush {}", config.output_csv.display()))?;
        rows
    };

    let report = PairReport {
        cached_samples: cached.len(),
        cached_skipped: cached.lines_skipped,
        noncached_samples: noncached.len(),
        noncached_skipped: noncached.lines_skipped,
        rows_written,
        policy: config.policy,
    };

    info!(
        rows = report.rows_written,
        cached_samples = report.cached_samples,
        noncached_samples = report.noncached_samples,
        policy = ?report.policy,
        "Pairing complete"
    );
    Ok(report)
}
