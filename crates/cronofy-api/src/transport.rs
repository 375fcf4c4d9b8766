//! HTTP transport used by the API client.
//!
//! [`Transport`] is the seam between the client and the network: one call in,
//! one status + body out. [`ReqwestTransport`] is the production
//! implementation; tests substitute scripted transports.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use thiserror::Error;
use tracing::trace;
use url::Url;

/// Time allowed to establish the TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Time allowed for the TLS handshake once connected.
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
/// Time allowed for the whole exchange, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Timeouts and identification for the default transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// TLS handshake timeout.
    pub tls_handshake_timeout: Duration,
    /// Overall request timeout.
    pub request_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            tls_handshake_timeout: DEFAULT_TLS_HANDSHAKE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("cronofy-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Builder method to set the overall request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A single outgoing call.
#[derive(Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL, query string included.
    pub url: Url,
    /// Bearer token sent in the `Authorization` header.
    pub bearer_token: String,
}

impl TransportRequest {
    /// Creates a GET request.
    pub fn get(url: Url, bearer_token: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url,
            bearer_token: bearer_token.into(),
        }
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Status and fully read body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from a status code and body.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The phase in which a transport call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The HTTP client or request could not be built.
    Build,
    /// Connection or TLS setup failed.
    Connect,
    /// A configured timeout elapsed.
    Timeout,
    /// The request failed after the connection was established.
    Request,
    /// Reading the response body failed.
    Body,
}

impl TransportErrorKind {
    /// Returns a stable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure before a complete HTTP response was obtained.
#[derive(Debug, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates a transport error of the given kind.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the failure phase.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_builder() {
            TransportErrorKind::Build
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, "request failed").with_source(err)
    }
}

/// Performs HTTP calls on behalf of the client.
///
/// Implementations must return only once the body has been read in full (or
/// reading failed) and must release the underlying connection on every path.
pub trait Transport: Send + Sync {
    /// Executes one request.
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>>;
}

/// The default [`Transport`], backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given timeouts.
    ///
    /// reqwest bounds TCP connect and TLS handshake with a single connect
    /// timeout, so both budgets are summed.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout + config.tls_handshake_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                TransportError::new(TransportErrorKind::Build, "failed to create HTTP client")
                    .with_source(e)
            })?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>> {
        Box::pin(async move {
            trace!(method = %request.method, url = %request.url, "sending request");

            let response = self
                .client
                .request(request.method, request.url)
                .bearer_auth(&request.bearer_token)
                .send()
                .await
                .map_err(TransportError::from_reqwest)?;

            let status = response.status();

            // `bytes()` consumes the response, so the connection is handed back
            // to the pool (or closed) whether or not the read succeeds.
            let body = response.bytes().await.map_err(|e| {
                let kind = if e.is_timeout() {
                    TransportErrorKind::Timeout
                } else {
                    TransportErrorKind::Body
                };
                TransportError::new(kind, "reading response body failed").with_source(e)
            })?;

            trace!(status = status.as_u16(), bytes = body.len(), "response received");

            Ok(RawResponse::new(status, body.to_vec()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let config = TransportConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.tls_handshake_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("cronofy-rs/"));
    }

    #[test]
    fn request_debug_redacts_token() {
        let url = Url::parse("https://api.cronofy.com/v1/calendars").unwrap();
        let request = TransportRequest::get(url, "super-secret");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("/v1/calendars"));
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::new(TransportErrorKind::Timeout, "request timed out");
        assert_eq!(err.kind(), TransportErrorKind::Timeout);
        assert_eq!(err.to_string(), "timeout error: request timed out");
    }

    #[test]
    fn transport_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset by peer");
        let err = TransportError::new(TransportErrorKind::Body, "read failed").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn builds_default_transport() {
        assert!(ReqwestTransport::new(&TransportConfig::default()).is_ok());
    }
}
