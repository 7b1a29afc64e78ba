use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::shared::config;

const DEFAULT_LOG_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Set up tracing
///
/// Logs go to:
/// - stdout (colored)
/// - `<log_dir>/backend.log` (plain); a relative `log_dir` is taken from the executable directory
pub fn initialize(log_dir: &str) -> anyhow::Result<()> {
    println!("========================================");
    println!("  LOGGING SYSTEM INITIALIZATION");
    println!("========================================\n");

    let log_dir = config::resolve_path(log_dir);
    println!("✓ Log directory: {}", log_dir.display());

    match std::fs::create_dir_all(&log_dir) {
        Ok(_) => println!("✓ Log directory ready"),
        Err(e) => {
            println!("✗ ERROR: Cannot create log directory: {}", e);
            println!("  Error kind: {:?}", e.kind());
            println!("========================================\n");
            return Err(anyhow::anyhow!("Cannot create log directory: {}", e));
        }
    }

    let log_file = open_log_file(&log_dir.join("backend.log"))?;

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    println!("✓ Log level: {}", log_level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .try_init()?;

    println!("✓ Tracing subscriber initialized");
    println!("========================================\n");

    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => {
            println!("✓ Log file: {}", path.display());
            Ok(f)
        }
        Err(e) => {
            println!("✗ ERROR: Cannot open log file: {}", e);
            println!("  Path: {}", path.display());
            println!("========================================\n");
            Err(anyhow::anyhow!("Cannot open log file: {}", e))
        }
    }
}
