//! latpair: cache benchmark latency log pairing.
//!
//! Reads two plain-text latency logs — one from a cached benchmark
//! run, one from a non-cached run, one integer measurement per line —
//! and emits a two-column CSV pairing the i-th sample of each.
//!
//! ## Architecture
//!
//! - **sequence**: log parsing (filters lines to the integer-valued ones)
//! - **pairing**: pairing policy and CSV emission
//! - **config**: layered run configuration (env var -> TOML -> defaults)

pub mod config;
pub mod pairing;
pub mod sequence;

// Re-export run configuration
pub use config::{ConfigError, PairConfig};

// Re-export commonly used types
pub use pairing::{pair_files, write_pairs, PairError, PairPolicy, PairReport, CSV_HEADER};
pub use sequence::{parse_sample, parse_sequence, LatencySample, LatencySequence};
