use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

const DEFAULT_FILTER: &str = "warn,anchorscope=info";

/// Installs the global tracing subscriber.
///
/// With `log_file` set, events are appended to that file. Otherwise headless
/// runs log to stderr and TUI runs install nothing, so the alternate screen
/// is never written over.
pub(crate) fn init_logging(log_file: Option<&str>, tui: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|err| Error::Logging(err.to_string()))?;
            tracing::info!("logging to {path}");
        }
        None if tui => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .try_init()
                .map_err(|err| Error::Logging(err.to_string()))?;
        }
    }

    Ok(())
}
