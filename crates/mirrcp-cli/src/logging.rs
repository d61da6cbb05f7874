//! Logging initialization: identical console and file sinks
//!
//! Every event goes to two places with the same line format: stdout and the
//! append-only log file. The file writer is non-blocking; the returned guard
//! must stay alive for the lifetime of the process so buffered lines are
//! flushed on shutdown.

use anyhow::{anyhow, Result};
use chrono::Local;
use mirrcp_config::Config;
use std::fmt;
use std::path::Path;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Line format `<timestamp> - <LEVEL> - <free text>`
#[derive(Clone, Copy, Default)]
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber. Returns the file writer guard, if a log
/// file is configured.
pub fn init(config: &Config, debug: bool) -> Result<Option<WorkerGuard>> {
    let level = if debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(std::io::stdout);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    match &config.logging.log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(writer);
            registry.with(file_layer).init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}

fn file_writer(path: &Path) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path '{}' has no file name", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
