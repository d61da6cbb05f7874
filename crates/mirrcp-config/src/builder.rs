//! Configuration builder for flexible configuration loading

use crate::{Config, ConfigError, ConfigResult};
use config::{Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Configuration builder layering defaults, files, and environment variables
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

#[derive(Debug, Clone)]
enum ConfigSource {
    Defaults,
    File { path: PathBuf, format: FileFormat },
    Environment { prefix: String },
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add default configuration values as the base layer
    pub fn add_defaults(mut self) -> Self {
        self.sources.push(ConfigSource::Defaults);
        self
    }

    /// Add a configuration file source; format is detected from the extension
    pub fn add_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = Self::detect_format(&path);
        self.sources.push(ConfigSource::File { path, format });
        self
    }

    /// Add environment variable overrides with the given prefix
    pub fn add_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.sources.push(ConfigSource::Environment {
            prefix: prefix.into(),
        });
        self
    }

    /// Assemble the layered configuration.
    ///
    /// Validation is left to the caller: required values such as the tree
    /// roots may still arrive from the command line after this step.
    pub fn build(self) -> ConfigResult<Config> {
        let mut builder = config::Config::builder();

        for source in self.sources {
            builder = match source {
                ConfigSource::Defaults => {
                    let defaults =
                        toml::to_string(&Config::default()).map_err(|e| ConfigError::Load {
                            message: e.to_string(),
                        })?;
                    builder.add_source(File::from_str(&defaults, FileFormat::Toml))
                }
                ConfigSource::File { path, format } => {
                    builder.add_source(File::from(path).format(format).required(true))
                }
                ConfigSource::Environment { prefix } => {
                    builder.add_source(Environment::with_prefix(&prefix).separator("__"))
                }
            };
        }

        let assembled = builder.build().map_err(|e| ConfigError::Load {
            message: e.to_string(),
        })?;

        assembled
            .try_deserialize::<Config>()
            .map_err(|e| ConfigError::Load {
                message: e.to_string(),
            })
    }

    fn detect_format(path: &Path) -> FileFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => FileFormat::Yaml,
            _ => FileFormat::Toml,
        }
    }
}
