use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const DEFAULT_FILTER: &str = "info";

/// Route tracing output to the log file in the data directory.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// `RUST_LOG` refines the default directive. Installing twice is a no-op.
pub fn init_tracing(config: &AppConfig, filter: Option<String>) -> Result<()> {
    let filter = filter.unwrap_or_else(|| DEFAULT_FILTER.to_string());
    let directive: Directive = filter
        .parse()
        .with_context(|| format!("invalid log directive '{}'", filter))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("failed to open log file {}", config.log_path().display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
