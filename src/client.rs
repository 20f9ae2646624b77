//! Telerivet API client.
//!
//! [`HttpTransport`] performs authenticated HTTP calls and categorizes
//! errors; [`TelerivetClient`] is the cloneable handle that entities and
//! cursors hold. Resource operations live on the model types.

use std::env;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{Result, TelerivetError};
use crate::params::{encode_query, Params};
use crate::traits::{Method, Transport};

const DEFAULT_API_URL: &str = "https://api.telerivet.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str = concat!("telerivet-rust/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HttpTransport`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Telerivet API key.
    pub api_key: String,
    /// API root, e.g. `https://api.telerivet.com/v1`.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Settings with the default API URL and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read settings from environment variables.
    ///
    /// Uses `TELERIVET_API_KEY` (required), `TELERIVET_API_URL` and
    /// `TELERIVET_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `TELERIVET_API_KEY` is not set or the timeout is not a number.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TELERIVET_API_KEY").map_err(|_| {
            TelerivetError::ConfigMissing(
                "TELERIVET_API_KEY environment variable not set".to_string(),
            )
        })?;

        let mut config = Self::new(api_key);

        if let Ok(url) = env::var("TELERIVET_API_URL") {
            config.api_url = url;
        }

        if let Ok(secs) = env::var("TELERIVET_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                TelerivetError::ConfigMissing(format!(
                    "TELERIVET_TIMEOUT_SECS must be a number of seconds, got '{secs}'"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Production [`Transport`] backed by `reqwest`.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // Ensure base URL ends with / so joins keep the version prefix
        let base_url_str = if config.api_url.ends_with('/') {
            config.api_url.clone()
        } else {
            format!("{}/", config.api_url)
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout)
            .build()
            .map_err(TelerivetError::HttpError)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Decode a response body and turn API error objects into typed errors.
    fn decode_body(status: u16, body: &str) -> Result<Value> {
        let value: Value =
            serde_json::from_str(body).map_err(|_| TelerivetError::MalformedResponse {
                status,
                body: body.to_string(),
            })?;

        if value.get("error").is_none() {
            return Ok(value);
        }
        let error = &value["error"];

        let field = |name: &str| {
            error
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let message = match error.as_str() {
            Some(text) => text.to_string(),
            None => field("message"),
        };
        let code = field("code");

        Err(match code.as_str() {
            "invalid_param" => TelerivetError::InvalidParameter {
                message,
                param: field("param"),
                code,
            },
            "not_found" => TelerivetError::NotFound { message, code },
            _ => TelerivetError::Api {
                message,
                code,
                status_code: Some(status),
            },
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, method, params), fields(method = %method))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Value> {
        let url = self.url_for(path)?;

        let builder = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Delete => self.http.delete(url),
        };

        let builder = match params {
            Some(params) if method.has_body() => builder.json(params),
            Some(params) => builder.query(&encode_query(params)),
            None => builder,
        };

        let response = builder
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await
            .map_err(TelerivetError::HttpError)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(TelerivetError::HttpError)?;
        tracing::debug!(status, bytes = body.len(), "received response");

        Self::decode_body(status, &body)
    }
}

/// Handle to the Telerivet REST API.
///
/// This struct is cheaply cloneable; clones share the same transport and
/// request counter. Entities and cursors keep a clone so they can load,
/// save and page on their own.
///
/// # Example
///
/// ```no_run
/// use telerivet::TelerivetClient;
///
/// # fn example() -> telerivet::Result<()> {
/// // Create from environment variables
/// let client = TelerivetClient::from_env()?;
///
/// // Or configure manually
/// let client = TelerivetClient::new("your-api-key", "https://api.telerivet.com/v1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TelerivetClient {
    transport: Arc<dyn Transport>,
    num_requests: Arc<AtomicU64>,
}

impl fmt::Debug for TelerivetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelerivetClient")
            .field("num_requests", &self.num_requests())
            .finish_non_exhaustive()
    }
}

impl TelerivetClient {
    /// Create a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if `TELERIVET_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Create a client with the provided API key and API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid.
    pub fn new(api_key: &str, api_url: &str) -> Result<Self> {
        let mut config = ClientConfig::new(api_key);
        config.api_url = api_url.to_string();
        Self::from_config(&config)
    }

    /// Create a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            num_requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of requests issued through this client and its clones.
    pub fn num_requests(&self) -> u64 {
        self.num_requests.load(Ordering::Relaxed)
    }

    /// Issue a raw API request.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Value> {
        self.num_requests.fetch_add(1, Ordering::Relaxed);
        self.transport.request(method, path, params).await
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str, params: Option<&Params>) -> Result<Value> {
        self.request(Method::Get, path, params).await
    }

    /// Make a POST request.
    pub async fn post(&self, path: &str, params: Option<&Params>) -> Result<Value> {
        self.request(Method::Post, path, params).await
    }

    /// Make a PUT request.
    pub async fn put(&self, path: &str, params: Option<&Params>) -> Result<Value> {
        self.request(Method::Put, path, params).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str, params: Option<&Params>) -> Result<Value> {
        self.request(Method::Delete, path, params).await
    }
}
