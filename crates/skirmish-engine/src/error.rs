//! Engine binary errors.
//!
//! Wraps the failures that can abort startup or the demo run into one
//! error type for `main` to report.

use thiserror::Error;

use skirmish_core::config::ConfigError;
use skirmish_core::error::MatchError;

/// Errors that can abort the engine binary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A demo match operation was rejected.
    #[error("match error: {source}")]
    Match {
        /// The underlying match error.
        #[from]
        source: MatchError,
    },
}
