use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Configuration file could not be read or written.
    #[error("Failed to access configuration file {path}: {source}")]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file exists but is not valid JSON for the expected shape.
    #[error("Failed to parse configuration file {path}: {source}")]
    Json {
        /// Path of the configuration file
        path: PathBuf,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration value is present but unusable.
    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue {
        /// Configuration key
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
