//! Tracing subscriber setup for hosts embedding the runtime.
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::Result;

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Logs to stderr, filtered by `RUST_LOG`.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs to `{dir}/inventory.log` through a non-blocking writer.
///
/// The returned guard flushes pending lines when dropped; keep it alive for
/// the lifetime of the process.
pub fn init_file(dir: impl AsRef<Path>) -> Result<WorkerGuard> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, "inventory.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init();

    tracing::info!("Log file: {}/inventory.log", dir.display());
    Ok(guard)
}
