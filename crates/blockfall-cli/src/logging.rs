use std::{fs::File, path::Path, sync::Arc};

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to `path`.
///
/// The terminal belongs to the TUI, so logs only go to a file. The filter
/// defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init_file_logging(path: &Path) -> anyhow::Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}
