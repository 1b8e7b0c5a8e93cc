use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::ConsoleError;

/// The UI owns the terminal, so traces only go to a file and only when one is
/// configured.
pub fn init_tracing(config: &AppConfig) -> Result<bool, ConsoleError> {
    let Some(path) = config.log_path.as_ref() else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConsoleError::LogFile {
            path: path.clone(),
            source,
        })?;
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| ConsoleError::Logging(error.to_string()))?;
    Ok(true)
}
