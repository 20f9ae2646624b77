//! Transport trait for issuing API requests.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::params::Params;

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether parameters travel in the request body rather than the query string.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performs a single API call and decodes the JSON response.
///
/// Implementations own authentication, timeouts and error categorization.
/// [`HttpTransport`](crate::HttpTransport) is the production implementation;
/// tests can substitute their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method` against `path` (relative to the API root, starting with `/`).
    ///
    /// # Errors
    ///
    /// Returns a categorized [`TelerivetError`](crate::TelerivetError) when the
    /// server rejects the call or the response cannot be decoded.
    async fn request(&self, method: Method, path: &str, params: Option<&Params>)
        -> Result<Value>;
}
