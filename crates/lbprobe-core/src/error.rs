use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;
use toml::ser::Error as TomlSerError;

/// Result type for smoke-test operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors raised while configuring or talking to the service under test.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// TOML serialization failed.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] TomlSerError),

    /// Configuration is invalid or incomplete.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured base URL cannot be used.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// The service answered with a status the caller did not accept.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// Numeric HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The login response carried no usable `access_token`.
    #[error("Login response missing access_token")]
    MissingToken,
}

impl Error {
    /// Whether the error comes from failing to reach the server at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_connect())
    }
}
