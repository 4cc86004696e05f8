//! Observability subsystem for salesquery
//!
//! Structured logging through `tracing`. Every log line names its event
//! from the typed `Event` table:
//!
//! ```ignore
//! use salesquery::observability::{self, Event};
//!
//! observability::init_logging("info")?;
//! tracing::info!(event = %Event::Serving, port = 3000, "listening");
//! ```
//!
//! The level comes from config. `RUST_LOG`, when set, overrides it.

mod events;

pub use events::Event;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Logging setup failures
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Builds the filter: `RUST_LOG` if set, else `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level).map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// Installs the global fmt subscriber. Output goes to stderr so stdout
/// stays free for CLI responses.
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let filter = env_filter(level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_parses() {
        assert!(env_filter("debug").is_ok());
        assert!(env_filter("salesquery=trace,tower_http=info").is_ok());
    }

    #[test]
    fn test_second_init_reports_error() {
        let _ = init_logging("info");
        assert!(matches!(
            init_logging("info"),
            Err(LoggingError::AlreadyInitialized(_))
        ));
    }
}
