//! Error types and handling for mirrcp
//!
//! mirrcp distinguishes exactly two failure tiers. Fatal-to-pass errors
//! (missing source root, replica root that cannot be created, invalid
//! configuration) abort the current pass without mutating anything; the next
//! pass retries from scratch. Local errors (an unreadable file, one failed
//! copy or delete) are reported and isolated to the file or action they
//! occurred on.

use std::path::PathBuf;

use crate::types::PathKey;

/// Error severity level, encoding the failure-isolation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Local failure; processing continues with the next file or action
    Local,
    /// Aborts the current pass; the process keeps running and retries next pass
    Fatal,
}

/// Main error type for mirrcp operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// The source root was missing at the start of a pass
    #[error("Source folder '{path}' does not exist")]
    SourceMissing {
        /// Path to the missing source root
        path: PathBuf,
    },

    /// The source root exists but is not a directory
    #[error("Source path '{path}' is not a directory")]
    SourceNotDirectory {
        /// Path that was expected to be a directory
        path: PathBuf,
    },

    /// The replica root was missing and could not be created
    #[error("Failed to create replica folder '{path}': {message}")]
    ReplicaCreate {
        /// Path to the replica root
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// A single copy action failed
    #[error("Failed to copy '{key}': {message}")]
    Copy {
        /// Key of the file that failed to copy
        key: PathKey,
        /// Underlying cause
        message: String,
    },

    /// A single delete action failed
    #[error("Failed to remove '{key}': {message}")]
    Delete {
        /// Key of the file that failed to delete
        key: PathKey,
        /// Underlying cause
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

impl Error {
    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceMissing { .. }
            | Self::SourceNotDirectory { .. }
            | Self::ReplicaCreate { .. }
            | Self::Config { .. } => ErrorSeverity::Fatal,
            Self::Io { .. } | Self::Copy { .. } | Self::Delete { .. } | Self::Other { .. } => {
                ErrorSeverity::Local
            }
        }
    }

    /// Whether this error aborts the pass that produced it
    pub fn is_fatal_to_pass(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
