//! Error types for the VR Lab server binary.
//!
//! [`StartupError`] wraps every failure `main` can hit before or while
//! serving, so it can propagate with `?`.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: vrlab_core::config::ConfigError,
    },

    /// The configured log level is not a valid filter directive.
    #[error("invalid log level {level:?}: {message}")]
    Logging {
        /// The rejected level string.
        level: String,
        /// Parser message.
        message: String,
    },

    /// The HTTP collector client could not be built.
    #[error("collector error: {source}")]
    Collector {
        /// The underlying collector error.
        #[from]
        source: vrlab_core::collector::CollectorError,
    },

    /// The API server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: vrlab_api::ServerError,
    },
}
