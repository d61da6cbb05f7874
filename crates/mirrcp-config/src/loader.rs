//! Configuration loader utilities

use crate::{Config, ConfigBuilder, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MIRRCP";

/// Configuration loader with common loading patterns
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default locations.
    ///
    /// Probes `mirrcp.toml`, `mirrcp.yaml`, and `mirrcp.yml` in the current
    /// directory; the first one found is used. Environment variables with the
    /// `MIRRCP` prefix are layered on top either way.
    pub fn load_default() -> ConfigResult<Config> {
        let mut builder = ConfigBuilder::new().add_defaults();

        for path in Self::default_config_paths() {
            if path.exists() {
                builder = builder.add_source_file(&path);
                break;
            }
        }

        builder.add_env_prefix(ENV_PREFIX).build()
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Configuration file not found",
                ),
            });
        }

        ConfigBuilder::new()
            .add_defaults()
            .add_source_file(path)
            .add_env_prefix(ENV_PREFIX)
            .build()
    }

    /// Save configuration to a file; format follows the file extension
    pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => {
                serde_yaml::to_string(config).map_err(|e| ConfigError::Serialization {
                    message: e.to_string(),
                })?
            }
            _ => toml::to_string_pretty(config).map_err(|e| ConfigError::Serialization {
                message: e.to_string(),
            })?,
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn default_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("mirrcp.toml"),
            PathBuf::from("mirrcp.yaml"),
            PathBuf::from("mirrcp.yml"),
        ]
    }
}
