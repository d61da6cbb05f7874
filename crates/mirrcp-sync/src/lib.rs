//! One-way directory mirroring core for mirrcp
//!
//! This crate implements the synchronization algorithm behind the `mirrcp`
//! tool:
//!
//! - **Content digests**: streamed BLAKE3 fingerprints detect changed files
//!   without comparing bytes across trees
//! - **Tree snapshots**: one mapping per tree root from normalized relative
//!   path to digest, rebuilt from scratch every pass
//! - **Reconciliation**: a pure diff of two snapshots into copy and delete
//!   actions, leaving unchanged files untouched
//! - **Failure isolation**: one unreadable file or failed action never aborts
//!   the pass it happens in
//!
//! Everything here is synchronous, blocking I/O; scheduling repeated passes
//! is the caller's concern.
//!
//! # Examples
//!
//! ```rust
//! use mirrcp_sync::MirrorEngine;
//! use mirrcp_types::NullSink;
//!
//! # fn example() -> mirrcp_types::Result<()> {
//! let engine = MirrorEngine::new("/data/source", "/data/replica");
//! let summary = engine.run_pass(&NullSink)?;
//! println!("{} copied, {} removed", summary.stats.files_copied, summary.stats.files_removed);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod digest;
pub mod engine;
pub mod executor;
pub mod reconcile;
pub mod reporting;
pub mod snapshot;

pub use digest::{DigestProvider, DEFAULT_CHUNK_SIZE};
pub use engine::MirrorEngine;
pub use executor::{ActionExecutor, RootPair};
pub use reconcile::plan;
pub use reporting::TracingSink;
pub use snapshot::{Snapshotter, TreeSnapshot};
