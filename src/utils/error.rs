use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Request is missing the 'file' parameter")]
    RequestMalformed,

    #[error("Bundle '{bundle}' is not defined")]
    BundleNotFound { bundle: String },

    #[error("LESS compiler error: {message}")]
    TransformError { message: String },

    #[error("Minifier error: {message}")]
    MinifyError { message: String },

    #[error("Failed to write cache file {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundle '{bundle}' produced no output")]
    EmptyResult { bundle: String },
}

impl PackError {
    /// HTTP status reported to the client for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PackError::BundleNotFound { .. } => 404,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PackError::IoError(e) => format!("File system error: {}", e),
            PackError::ConfigError { message } | PackError::ConfigParseError { message } => {
                format!("Configuration problem: {}", message)
            }
            PackError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            PackError::WriteError { path, .. } => {
                format!("Could not write {}; check permissions and free space", path.display())
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
