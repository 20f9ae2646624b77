//! Error types for Telerivet API operations.

use thiserror::Error;

/// Errors that can occur during Telerivet API operations.
#[derive(Debug, Error)]
pub enum TelerivetError {
    /// Configuration is missing or incomplete.
    #[error("Telerivet configuration required: {0}")]
    ConfigMissing(String),

    /// The server rejected a request parameter.
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter {
        message: String,
        code: String,
        param: String,
    },

    /// The referenced resource does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String, code: String },

    /// Any other error reported by the API.
    #[error("Telerivet API error ({code}): {message}")]
    Api {
        message: String,
        code: String,
        status_code: Option<u16>,
    },

    /// The response body was not JSON.
    #[error("Unexpected response from Telerivet API (HTTP {status}): {body}")]
    MalformedResponse { status: u16, body: String },

    /// A cursor was constructed with a parameter it manages itself.
    #[error("Cannot construct cursor with '{0}' parameter; call count() instead")]
    ReservedCursorParam(String),

    /// An identifying field needed for the canonical path is absent.
    #[error("{kind} is missing identifying field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl TelerivetError {
    /// Returns true if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The server-side error code, if this error came from the API.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { code, .. }
            | Self::NotFound { code, .. }
            | Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type alias for Telerivet operations.
pub type Result<T> = core::result::Result<T, TelerivetError>;
