mod app;
mod palette;
mod renderer;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use folio_core::FolioConfig;
use tracing_subscriber::EnvFilter;

/// The terminal owns stdout, so logs only go to the file named by
/// `FOLIO_LOG`. Filtering follows `RUST_LOG`.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("FOLIO_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", PathBuf::from(&path).display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let data = std::fs::read(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            FolioConfig::from_json(&data)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => FolioConfig::default(),
    };

    renderer::run_tui(&config)
}
