//! File logging setup.
//!
//! The TUI owns the terminal, so log output always goes to a file. The level
//! comes from `RUST_LOG`, falling back to `warn`.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "warn";

/// Install a global subscriber appending to `log_path`.
pub fn init(log_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false);
    #[cfg(debug_assertions)]
    let layer = layer.with_file(true).with_line_number(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
    Ok(())
}
