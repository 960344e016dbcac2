//! Error types for the logging subsystem

use thiserror::Error;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum LoggingError {
    /// A filter directive could not be parsed
    #[error("invalid filter directive `{directive}`: {source}")]
    InvalidDirective {
        directive: String,
        #[source]
        source: ParseError,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),
}
