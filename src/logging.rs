//! Logging Module
//!
//! Routes `tracing` events to a daily log file through a background writer,
//! plus a compact stderr layer in debug builds.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

const LOG_FILE_PREFIX: &str = "smart-ledger.log";

/// Install the global subscriber for `config`.
///
/// The returned guard flushes buffered lines when dropped, so the caller
/// keeps it alive for the lifetime of the process. An already installed
/// subscriber is left in place.
pub fn init(config: &AppConfig) -> std::io::Result<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let (writer, guard) = file_writer(&log_dir);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    let console_layer = cfg!(debug_assertions).then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let installed = tracing_subscriber::registry()
        .with(filter(&config.log_filter))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    if !installed {
        tracing::debug!("Log subscriber already installed, keeping the existing one");
    }

    Ok(guard)
}

fn file_writer(log_dir: &Path) -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX))
}

/// `RUST_LOG` wins over the configured directives; unparsable directives
/// fall back to `info`.
fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn init_creates_log_directory_and_hands_back_guard() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default().with_data_dir(dir.path());

        let guard = init(&config).unwrap();
        tracing::info!("logging initialized");
        drop(guard);

        assert!(config.log_dir().is_dir());
    }

    #[test]
    #[serial]
    fn configured_directives_apply_without_rust_log() {
        std::env::remove_var("RUST_LOG");
        let rendered = filter("smart_ledger_lib=trace,warn").to_string();

        assert!(rendered.contains("smart_ledger_lib=trace"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    #[serial]
    fn rust_log_overrides_configured_directives() {
        std::env::set_var("RUST_LOG", "error");
        let rendered = filter("smart_ledger_lib=trace").to_string();
        std::env::remove_var("RUST_LOG");

        assert_eq!(rendered, "error");
    }
}
