// folio - portfolio page presentation layer, driven headless
//
// Architecture:
// - Page (dom): in-process document with events, timers and observers
// - Components: six independent behaviors sharing one lifecycle contract
// - Application: composition root that starts them and watches for failures
// - Demo: builds the portfolio markup and replays a visitor session
//
// Page tasks are !Send, so everything runs on a current-thread runtime
// inside a LocalSet.

use anyhow::Result;
use clap::Parser;
use folio::cli::{self, Cli};
use folio::config::{Config, LoggingConfig};
use folio::demo;
use folio::dom::Page;
use folio::logging::{CaptureLayer, LogBuffer, LogLevel};
use folio::storage::{FileStore, KeyValueStore, MemoryStore};
use std::rc::Rc;
use std::sync::Arc;
use tokio::task::LocalSet;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing: stderr output, in-memory capture, optional JSON log files
///
/// Precedence: RUST_LOG env var > config file > default "info".
/// The returned guard must live until exit so buffered file logs flush.
fn init_tracing(logging: &LoggingConfig, buffer: &LogBuffer) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    let (file_layer, guard) = if logging.file_enabled {
        match logging.file_appender() {
            Ok(appender) => {
                // Writes happen on a background thread
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                // Fall back to stderr only
                eprintln!("Warning: {e:#}");
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(CaptureLayer::new(buffer.clone()))
        .with(file_layer)
        .init();

    guard
}

/// Theme preference survives between runs when the data dir is usable
fn open_store() -> Rc<dyn KeyValueStore> {
    let Some(path) = FileStore::default_path() else {
        tracing::warn!("no data directory; preferences will not persist");
        return Rc::new(MemoryStore::new());
    };
    match FileStore::open(&path) {
        Ok(store) => {
            tracing::debug!(path = %store.path().display(), "opened preference store");
            Rc::new(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "preference store unavailable; using memory");
            Rc::new(MemoryStore::new())
        }
    }
}

fn print_log_summary(buffer: &LogBuffer) {
    let warnings = buffer.count(LogLevel::Warn);
    let errors = buffer.at_least(LogLevel::Error);

    println!();
    println!("Log: {} entries, {} warnings, {} errors", buffer.len(), warnings, errors.len());
    for entry in errors {
        println!(
            "  {} {} {}: {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.level.as_str(),
            entry.target,
            entry.message
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file must not lock the user out of resetting it
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) if cli.manages_config() => {
            eprintln!("Warning: {e:#}");
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config.logging, &log_buffer);

    if cli::handle_cli(&cli, &config).await? {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let page = Page::new(open_store());
    let report = LocalSet::new()
        .run_until(demo::run_session(Arc::new(config), page))
        .await?;

    println!("{report}");
    print_log_summary(&log_buffer);

    Ok(())
}
