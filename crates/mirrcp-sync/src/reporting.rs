//! Production event sink backed by `tracing`

use mirrcp_types::EventSink;
use tracing::{error, info};

/// Event sink that forwards every event to the `tracing` macros.
///
/// The sink is still an explicit collaborator: where events end up is decided
/// once, by whoever installs the subscriber, not by the synchronization code.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}
