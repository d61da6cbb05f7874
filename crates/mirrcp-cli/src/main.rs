//! mirrcp - periodic one-way directory mirroring
//!
//! Keeps a replica directory tree identical to a source tree by running a
//! full synchronization pass on a fixed interval. Unchanged files are
//! detected by content digest and left untouched; one file's failure never
//! aborts a pass.

use anyhow::Result;
use clap::Parser;
use mirrcp_config::{Config, ConfigLoader};
use mirrcp_sync::MirrorEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod display;
mod logging;
mod scheduler;

/// Periodic one-way directory mirroring tool
#[derive(Parser)]
#[command(
    name = "mirrcp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Periodic one-way directory mirroring tool",
    long_about = "mirrcp keeps a replica folder identical to a source folder.\n\
                  Every pass it snapshots both trees, compares content digests,\n\
                  copies new and changed files, and removes files that no longer\n\
                  exist in the source. It runs until interrupted."
)]
struct Cli {
    /// Source folder path
    source: PathBuf,

    /// Replica folder path
    replica: PathBuf,

    /// Synchronization interval in seconds
    interval: u64,

    /// Log file path
    log_file: PathBuf,

    /// Configuration file path (positional arguments take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Suppress the per-action console echo
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let _guard = logging::init(&config, cli.debug)?;
    info!("mirrcp v{} starting", env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(MirrorEngine::from_config(&config));
    let sink = Arc::new(display::ConsoleSink::new(!cli.quiet));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, finishing the current pass");
            signal_token.cancel();
        }
    });

    scheduler::Scheduler::new(config.schedule.interval(), shutdown)
        .run(engine, sink)
        .await;

    info!("mirrcp stopped");
    Ok(())
}

/// Resolve the effective configuration: defaults, then an optional file and
/// environment overrides, then the command line on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load_default()?,
    };

    config.mirror.source_root = cli.source.clone();
    config.mirror.replica_root = cli.replica.clone();
    config.schedule.interval_secs = cli.interval;
    config.logging.log_file = Some(cli.log_file.clone());

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_arguments_parse() {
        let cli = Cli::parse_from(["mirrcp", "/src", "/dst", "60", "/var/log/mirrcp.log"]);

        assert_eq!(cli.source, PathBuf::from("/src"));
        assert_eq!(cli.replica, PathBuf::from("/dst"));
        assert_eq!(cli.interval, 60);
        assert_eq!(cli.log_file, PathBuf::from("/var/log/mirrcp.log"));
        assert!(!cli.quiet);
    }

    #[test]
    fn positional_arguments_override_config_defaults() {
        let cli = Cli::parse_from(["mirrcp", "/src", "/dst", "5", "sync.log"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.mirror.source_root, PathBuf::from("/src"));
        assert_eq!(config.schedule.interval_secs, 5);
        assert_eq!(config.logging.log_file, Some(PathBuf::from("sync.log")));
    }

    #[test]
    fn nested_roots_are_rejected_at_startup() {
        let cli = Cli::parse_from(["mirrcp", "/data", "/data/replica", "60", "sync.log"]);
        assert!(load_config(&cli).is_err());
    }
}
