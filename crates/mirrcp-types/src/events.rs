//! Event reporting collaborator
//!
//! Every significant event (pass start, each copy, each delete, each failure)
//! is reported through an [`EventSink`] that is constructed once and passed
//! by reference into the components that produce events. Logging is never
//! reached through ambient global state, so embedders control exactly where
//! events go and tests can capture them.

/// Destination for informational and error events produced during a pass
pub trait EventSink {
    /// Report a normal event
    fn info(&self, message: &str);

    /// Report a failure
    fn error(&self, message: &str);
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
