//! Result type alias for mirrcp operations

use crate::Error;

/// Result type alias for mirrcp operations
pub type Result<T> = std::result::Result<T, Error>;
