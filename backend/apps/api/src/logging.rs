//! Log output: stdout plus an append-only file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;

/// Crates logged at `level` unless `RUST_LOG` says otherwise.
const LOGGED_CRATES: [&str; 4] = ["api", "account", "community", "tower_http"];

fn default_filter(level: &str) -> String {
    LOGGED_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .chain(std::iter::once(format!("audit={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber, writing to stdout and `file`.
pub fn init(file: &Path, level: &str) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let log_file = OpenOptions::new().create(true).append(true).open(file)?;
    let writer = io::stdout.and(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}
