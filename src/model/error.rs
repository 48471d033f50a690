//! Error types for the storystrip shell.
//!
//! The layout/paint/interaction core never fails: contract violations are
//! debug assertions and out-of-range lookups resolve to "nothing". Only the
//! shell around it (config loading, logging setup, the terminal host) can
//! fail, and those failures are collected here.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - log file setup failures
//!   - [`TuiError`](crate::view::TuiError) - terminal I/O failures

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal host failure.
    #[error("Terminal error: {0}")]
    Terminal(#[from] crate::view::TuiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn config_error_converts_into_app_error() {
        let err: AppError = crate::config::ConfigError::InvalidPath("x".into()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("Invalid config path"));
    }

    #[test]
    fn logging_error_converts_into_app_error() {
        let err: AppError = crate::logging::LoggingError::InvalidPath(PathBuf::from("/")).into();
        assert!(matches!(err, AppError::Logging(_)));
    }

    #[test]
    fn tui_error_converts_into_app_error() {
        let err: AppError = crate::view::TuiError::Io(std::io::Error::other("boom")).into();
        assert!(err.to_string().contains("boom"));
    }
}
