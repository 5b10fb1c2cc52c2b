//! Blocking HTTP client for the gateway, plus the JSON request helper the
//! table-operation clients share.

use dbdesk_types::{ApiError, HealthResponse, QueryRequest, QueryResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::app::{HEALTH_ROUTE, QUERY_ROUTE};
use crate::config::{DEFAULT_HOST, DEFAULT_PORT};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error body; `message` is its text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),
}

pub fn default_base_url() -> String {
    format!("http://{DEFAULT_HOST}:{DEFAULT_PORT}")
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
}

impl Default for GatewayClient {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn query(&self, path: &str, sql: &str) -> Result<QueryResponse, ClientError> {
        request_json(
            "POST",
            &format!("{}{QUERY_ROUTE}", self.base_url),
            Some(&QueryRequest::new(path, sql)),
        )
    }

    pub fn health(&self) -> Result<HealthResponse, ClientError> {
        request_json::<(), _>("GET", &format!("{}{HEALTH_ROUTE}", self.base_url), None)
    }
}

/// Send `body` (if any) as JSON and decode a JSON reply.
///
/// Non-2xx replies become [`ClientError::Api`], using the `error` field of
/// the body when there is one and the raw body text otherwise.
pub fn request_json<B, R>(method: &str, url: &str, body: Option<&B>) -> Result<R, ClientError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let request = ureq::request(method, url).set("accept", "application/json");
    let result = match body {
        Some(body) => {
            let body = serde_json::to_string(body)
                .map_err(|e| ClientError::Decode(format!("encode request for {url}: {e}")))?;
            request
                .set("content-type", "application/json")
                .send_string(&body)
        }
        None => request.call(),
    };

    match result {
        Ok(response) => {
            let text = response
                .into_string()
                .map_err(|e| ClientError::Transport(format!("read response body from {url}: {e}")))?;
            serde_json::from_str(&text)
                .map_err(|e| ClientError::Decode(format!("{method} {url}: {e}")))
        }
        Err(ureq::Error::Status(status, response)) => {
            let text = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|error| error.error)
                .unwrap_or(text);
            Err(ClientError::Api { status, message })
        }
        Err(error) => Err(ClientError::Transport(format!("{method} {url}: {error}"))),
    }
}
