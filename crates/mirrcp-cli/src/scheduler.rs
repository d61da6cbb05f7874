//! Pass scheduling with cooperative shutdown
//!
//! Passes run back to back on the blocking thread pool, separated by one full
//! interval measured from the end of the previous pass. Cancellation takes
//! effect between passes: an in-flight pass always completes first.

use mirrcp_sync::MirrorEngine;
use mirrcp_types::EventSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Runs synchronization passes on a fixed interval until cancelled
pub struct Scheduler {
    interval: Duration,
    shutdown: CancellationToken,
}

impl Scheduler {
    /// Create a scheduler
    pub fn new(interval: Duration, shutdown: CancellationToken) -> Self {
        Self { interval, shutdown }
    }

    /// Run passes until shutdown is requested
    pub async fn run(
        &self,
        engine: Arc<MirrorEngine>,
        sink: Arc<dyn EventSink + Send + Sync>,
    ) {
        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let pass_engine = Arc::clone(&engine);
            let pass_sink = Arc::clone(&sink);
            let outcome = tokio::task::spawn_blocking(move || {
                let events: &dyn EventSink = pass_sink.as_ref();
                pass_engine.run_pass(events)
            })
            .await;

            match outcome {
                Ok(Ok(summary)) => info!(
                    "Pass {} complete: {} copied, {} removed, {} failed",
                    summary.pass_id,
                    summary.stats.files_copied,
                    summary.stats.files_removed,
                    summary.stats.failures
                ),
                // The engine already reported the failure through the sink
                Ok(Err(err)) => debug!("Pass aborted: {err}"),
                Err(join_error) => error!("Pass task failed: {join_error}"),
            }

            tokio::select! {
                () = self.shutdown.cancelled() => break,
                () = time::sleep(self.interval) => {}
            }
        }
    }
}
