//! Console reporting for mirror events

use console::style;
use mirrcp_sync::TracingSink;
use mirrcp_types::EventSink;

/// Event sink that logs through `tracing` and additionally echoes per-action
/// lines to stdout.
///
/// The log line itself already reaches the console through the stdout logging
/// layer; the echo reproduces the raw `Copied:` / `Removed:` feedback lines
/// next to it.
#[derive(Debug)]
pub struct ConsoleSink {
    inner: TracingSink,
    echo_actions: bool,
}

impl ConsoleSink {
    /// Create a sink; `echo_actions` controls the stdout action lines
    pub fn new(echo_actions: bool) -> Self {
        Self {
            inner: TracingSink,
            echo_actions,
        }
    }
}

impl EventSink for ConsoleSink {
    fn info(&self, message: &str) {
        self.inner.info(message);
        if self.echo_actions
            && (message.starts_with("Copied: ") || message.starts_with("Removed: "))
        {
            println!("{} {}", style("→").green().bold(), message);
        }
    }

    fn error(&self, message: &str) {
        self.inner.error(message);
    }
}
