//! HTTP transport shared by all scanner backends
//!
//! The transport only moves bytes: it returns the status and raw body of any
//! response and leaves interpretation to the backend clients.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use reqwest::{Client as HttpClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::HttpSettings;
use crate::error::{ApiError, Result};

/// A request to a scanner, fully resolved except for transport concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl OutboundRequest {
    /// Create a request with no headers, query or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter. Values are URL-encoded by the transport.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body and the matching content type
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Look up a query parameter by name
    #[cfg(test)]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name (case-insensitive)
    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a scanner response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// Under [`DecodePolicy::Strict`] a malformed body is an error; under
    /// [`DecodePolicy::Tolerant`] it is logged and yields `Ok(None)`.
    pub fn decode<T: DeserializeOwned>(&self, policy: DecodePolicy) -> Result<Option<T>> {
        match serde_json::from_str(&self.body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => match policy {
                DecodePolicy::Strict => Err(ApiError::Decode(e.to_string()).into()),
                DecodePolicy::Tolerant => {
                    warn!("Ignoring undecodable response (status {}): {}", self.status, e);
                    Ok(None)
                }
            },
        }
    }
}

/// How a malformed response body is treated.
///
/// Listings favour completeness and keep going; single irreversible actions
/// favour correctness and fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    Strict,
    Tolerant,
}

/// Capability to send one request and return its raw response.
///
/// Implementations must not retry; a failed send is reported to the caller
/// as [`ApiError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse>;
}

/// Send a request, giving up as soon as the token is cancelled.
pub async fn send_cancellable(
    transport: &dyn Transport,
    request: OutboundRequest,
    cancel: &CancellationToken,
) -> Result<RawResponse> {
    if cancel.is_cancelled() {
        return Err(ApiError::Cancelled.into());
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Cancelled.into()),
        response = transport.send(request) => response,
    }
}

/// reqwest-backed transport with a client-side rate limit
pub struct HttpTransport {
    http: HttpClient,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpTransport {
    /// Build a transport from the `http` section of the config
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let per_second =
            NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self { http, rate_limiter })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse> {
        self.rate_limiter.until_ready().await;

        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .query(&request.query);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        debug!("-> {} ({} bytes)", status, body.len());

        Ok(RawResponse::new(status, body))
    }
}
