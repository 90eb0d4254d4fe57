//! Configuration management for stackup
//!
//! Settings are loaded from environment variables with defaults. Nothing here
//! is required; an empty environment yields a valid configuration.
//!
//! # Environment Variables
//!
//! - `STACKUP_OUTPUT_DIR`: Generated-artifact subdirectory - default: ".stackup"
//! - `STACKUP_PROBE_HOST`: Host readiness probes connect to - default: "127.0.0.1"
//! - `STACKUP_PROBE_TIMEOUT_MS`: Per-probe connect timeout - default: "1000"
//! - `STACKUP_POLL_INTERVAL_SECS`: Readiness polling interval - default: "2"
//! - `STACKUP_READY_TIMEOUT_SECS`: How long `up` waits for readiness - default: "120"
//! - `STACKUP_COMPOSE_BIN`: Compose program to run instead of auto-detection
//! - `STACKUP_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use stackup::StackupConfig;
//!
//! let config = StackupConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::layout::DEFAULT_OUTPUT_DIR;
use crate::probe::DEFAULT_PROBE_HOST;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Component, Path};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
const DEFAULT_READY_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackupConfig {
    /// Name of the output subdirectory under the project root
    pub output_dir: String,

    /// Host readiness probes connect to
    pub probe_host: String,

    pub probe_timeout_ms: u64,

    pub poll_interval_secs: u64,

    pub ready_timeout_secs: u64,

    /// Compose program override; detection is skipped when set
    pub compose_bin: Option<String>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for StackupConfig {
    /// Loads from `STACKUP_*` environment variables, falling back to defaults
    /// for missing or unparsable values.
    fn default() -> Self {
        let output_dir = env::var("STACKUP_OUTPUT_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let probe_host = env::var("STACKUP_PROBE_HOST")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROBE_HOST.to_string());

        let probe_timeout_ms = env::var("STACKUP_PROBE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_PROBE_TIMEOUT_MS);

        let poll_interval_secs = env::var("STACKUP_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let ready_timeout_secs = env::var("STACKUP_READY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_READY_TIMEOUT_SECS);

        let compose_bin = env::var("STACKUP_COMPOSE_BIN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let log_level = env::var("STACKUP_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            output_dir,
            probe_host,
            probe_timeout_ms,
            poll_interval_secs,
            ready_timeout_secs,
            compose_bin,
            log_level,
        }
    }
}

impl StackupConfig {
    /// Checks ranges and that the output directory is one level below the project root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=30_000).contains(&self.probe_timeout_ms) {
            return Err(ConfigError::ValidationFailed(format!(
                "Probe timeout must be between 1 and 30000 ms, got {}",
                self.probe_timeout_ms
            )));
        }

        if !(1..=60).contains(&self.poll_interval_secs) {
            return Err(ConfigError::ValidationFailed(format!(
                "Poll interval must be between 1 and 60 seconds, got {}",
                self.poll_interval_secs
            )));
        }

        if self.ready_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Readiness timeout must be at least 1 second".to_string(),
            ));
        }

        // compose paths (`..`, `../.env`) assume the output dir sits directly under the root
        let mut components = Path::new(&self.output_dir).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name || self.output_dir.contains('\\') {
            return Err(ConfigError::ParseError {
                field: "STACKUP_OUTPUT_DIR".to_string(),
                error: format!(
                    "'{}' must be a single directory name inside the project root",
                    self.output_dir
                ),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("output_dir".to_string(), self.output_dir.clone());
        map.insert("probe_host".to_string(), self.probe_host.clone());
        map.insert(
            "probe_timeout_ms".to_string(),
            self.probe_timeout_ms.to_string(),
        );
        map.insert(
            "poll_interval_secs".to_string(),
            self.poll_interval_secs.to_string(),
        );
        map.insert(
            "ready_timeout_secs".to_string(),
            self.ready_timeout_secs.to_string(),
        );
        if let Some(ref bin) = self.compose_bin {
            map.insert("compose_bin".to_string(), bin.clone());
        }
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for StackupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stackup Configuration:")?;
        writeln!(f, "  Output Dir: {}", self.output_dir)?;
        writeln!(f, "  Probe Host: {}", self.probe_host)?;
        writeln!(f, "  Probe Timeout: {}ms", self.probe_timeout_ms)?;
        writeln!(f, "  Poll Interval: {}s", self.poll_interval_secs)?;
        writeln!(f, "  Ready Timeout: {}s", self.ready_timeout_secs)?;
        if let Some(ref bin) = self.compose_bin {
            writeln!(f, "  Compose Bin: {}", bin)?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
