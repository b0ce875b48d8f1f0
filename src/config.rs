//! Run Configuration
//!
//! Three path parameters plus the pairing policy, loaded in layers the
//! operator can override:
//!
//! 1. `LATPAIR_CONFIG` environment variable (path to a TOML file)
//! 2. `latpair.toml` in the current working directory
//! 3. Built-in defaults (the historical `cached_latency` /
//!    `no_cache_latency` -> `latencies.csv` job)
//!
//! CLI flags override whatever the layers above produced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::pairing::PairPolicy;

/// Output path value that redirects the CSV to stdout.
pub const STDOUT_PATH: &str = "-";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid TOML in config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Output path {0} is also an input path - refusing to truncate an input log")]
    OutputClobbersInput(PathBuf),
}

fn default_cached_log() -> PathBuf {
    PathBuf::from("cached_latency")
}

fn default_noncached_log() -> PathBuf {
    PathBuf::from("no_cache_latency")
}

fn default_output_csv() -> PathBuf {
    PathBuf::from("latencies.csv")
}

/// Configuration for one pairing run.
///
/// Every field carries a default matching the historical single-node
/// job, so an empty TOML file (or none at all) reproduces it. The
/// multinode metadata-cache job is the same config with the
/// `meta_cache_latency` / `non_meta_cache_latency` /
/// `meta_multinode_latencies.csv` triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    /// Cached-run latency log.
    #[serde(default = "default_cached_log")]
    pub cached_log: PathBuf,

    /// Non-cached-run latency log.
    #[serde(default = "default_noncached_log")]
    pub noncached_log: PathBuf,

    /// Output CSV path; `-` writes to stdout. Overwritten on every run.
    #[serde(default = "default_output_csv")]
    pub output_csv: PathBuf,

    /// Out-of-range policy when the cached log is longer.
    #[serde(default)]
    pub policy: PairPolicy,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            cached_log: default_cached_log(),
            noncached_log: default_noncached_log(),
            output_csv: default_output_csv(),
            policy: PairPolicy::default(),
        }
    }
}

impl PairConfig {
    /// Load configuration from the layered search order.
    ///
    /// A broken layer (missing file, bad TOML) logs a warning and falls
    /// through to the next one; this never fails.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var("LATPAIR_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from LATPAIR_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from LATPAIR_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "LATPAIR_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./latpair.toml
        let local = PathBuf::from("latpair.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./latpair.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./latpair.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Whether the CSV goes to stdout instead of a file.
    pub fn writes_to_stdout(&self) -> bool {
        self.output_csv.as_os_str() == STDOUT_PATH
    }

    /// Reject configurations that would truncate an input on open.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.writes_to_stdout()
            && (self.output_csv == self.cached_log || self.output_csv == self.noncached_log)
        {
            return Err(ConfigError::OutputClobbersInput(self.output_csv.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_historical_job() {
        let config = PairConfig::default();

        assert_eq!(config.cached_log, PathBuf::from("cached_latency"));
        assert_eq!(config.noncached_log, PathBuf::from("no_cache_latency"));
        assert_eq!(config.output_csv, PathBuf::from("latencies.csv"));
        assert_eq!(config.policy, PairPolicy::Strict);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: PairConfig = toml::from_str(r#"policy = "lenient""#).unwrap();

        assert_eq!(config.policy, PairPolicy::Lenient);
        assert_eq!(config.cached_log, PathBuf::from("cached_latency"));
        assert_eq!(config.output_csv, PathBuf::from("latencies.csv"));
    }

    #[test]
    fn test_full_toml() {
        let config: PairConfig = toml::from_str(
            r#"
            cached_log = "meta_cache_latency"
            noncached_log = "non_meta_cache_latency"
            output_csv = "meta_multinode_latencies.csv"
            policy = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.cached_log, PathBuf::from("meta_cache_latency"));
        assert_eq!(config.noncached_log, PathBuf::from("non_meta_cache_latency"));
        assert_eq!(
            config.output_csv,
            PathBuf::from("meta_multinode_latencies.csv")
        );
        assert_eq!(config.policy, PairPolicy::Strict);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = toml::from_str::<PairConfig>(r#"policy = "sloppy""#);

        assert!(result.is_err());
    }

    #[test]
    fn test_stdout_sentinel() {
        let config = PairConfig {
            output_csv: PathBuf::from("-"),
            ..PairConfig::default()
        };

        assert!(config.writes_to_stdout());
        assert!(config.validate().is_ok());
        assert!(!PairConfig::default().writes_to_stdout());
    }

    #[test]
    fn test_validate_rejects_output_equal_to_input() {
        let config = PairConfig {
            output_csv: PathBuf::from("cached_latency"),
            ..PairConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputClobbersInput(_))
        ));
    }
}
