//! Core type system and error handling for mirrcp
//!
//! This crate provides the foundational types shared by every mirrcp crate:
//!
//! - **Error handling**: typed errors distinguishing fatal-to-pass failures
//!   from local, recoverable ones
//! - **Core types**: path keys, content digests, planned actions, and
//!   per-pass statistics
//! - **Event reporting**: the [`EventSink`] collaborator the synchronization
//!   components report through
//!
//! # Examples
//!
//! ```rust
//! use mirrcp_types::{PassStats, SyncAction, PathKey};
//! use std::path::Path;
//!
//! let action = SyncAction::Copy(PathKey::from_relative(Path::new("dir/a.txt")));
//! assert_eq!(action.key().as_str(), "dir/a.txt");
//!
//! let mut stats = PassStats::new();
//! stats.files_copied = 1;
//! assert_eq!(stats.actions_applied(), 1);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod events;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorSeverity};
pub use events::{EventSink, NullSink};
pub use result::Result;
pub use types::*;
