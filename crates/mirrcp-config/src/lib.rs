//! Configuration management for mirrcp
//!
//! This crate provides layered configuration for the mirrcp mirroring tool:
//! defaults, an optional TOML or YAML configuration file, and
//! `MIRRCP`-prefixed environment variable overrides. Command-line arguments
//! are applied on top by the binary.
//!
//! # Examples
//!
//! ```rust
//! use mirrcp_config::Config;
//!
//! let mut config = Config::default();
//! config.mirror.source_root = "/data/source".into();
//! config.mirror.replica_root = "/data/replica".into();
//! config.validate().expect("valid configuration");
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Main configuration structure for mirrcp
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source and replica tree roots
    pub mirror: MirrorConfig,
    /// Pass scheduling configuration
    pub schedule: ScheduleConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Synchronization tuning
    pub sync: SyncConfig,
}

/// Source and replica tree roots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Root of the tree to mirror from
    pub source_root: PathBuf,
    /// Root of the tree to mirror onto
    pub replica_root: PathBuf,
}

/// Pass scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds to wait between the end of one pass and the start of the next
    pub interval_secs: u64,
}

impl ScheduleConfig {
    /// The inter-pass interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only log file; `None` logs to the console only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Log filter level (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            level: "info".to_string(),
        }
    }
}

/// Synchronization tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Propagate source permission bits onto copied replica files
    pub preserve_permissions: bool,
    /// Read chunk size used when digesting file contents, in bytes
    pub digest_chunk_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
            digest_chunk_size: 64 * 1024,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Rejects missing roots, a zero interval or chunk size, and root pairs
    /// whose behavior would be undefined: identical roots, roots that differ
    /// only in character case (aliases on case-insensitive filesystems), and
    /// nested roots (either root inside the other).
    pub fn validate(&self) -> ConfigResult<()> {
        if self.mirror.source_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "mirror.source_root".to_string(),
            });
        }
        if self.mirror.replica_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "mirror.replica_root".to_string(),
            });
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "schedule.interval_secs".to_string(),
                message: "interval must be at least one second".to_string(),
            });
        }
        if self.sync.digest_chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sync.digest_chunk_size".to_string(),
                message: "chunk size must be non-zero".to_string(),
            });
        }

        let source = folded_components(&absolutize(&self.mirror.source_root));
        let replica = folded_components(&absolutize(&self.mirror.replica_root));

        if source == replica {
            return Err(ConfigError::Validation {
                message: format!(
                    "source and replica roots must name distinct directories \
                     (got '{}' and '{}')",
                    self.mirror.source_root.display(),
                    self.mirror.replica_root.display()
                ),
            });
        }
        if source.starts_with(&replica[..]) || replica.starts_with(&source[..]) {
            return Err(ConfigError::Validation {
                message: format!(
                    "source and replica roots must not nest (got '{}' and '{}')",
                    self.mirror.source_root.display(),
                    self.mirror.replica_root.display()
                ),
            });
        }

        Ok(())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

// Components lowered to ASCII lowercase: equality or prefixing on the folded
// form catches case-aliased roots as well as literally nested ones.
fn folded_components(path: &Path) -> Vec<String> {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_ascii_lowercase())
        .collect()
}
