//! Error types for API client operations.
//!
//! Every failure is terminal for the call that produced it: the client never
//! retries and never substitutes a default value.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::normalize::NormalizeError;
use crate::transport::TransportError;

/// The category of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// No HTTP response was obtained.
    TransportError,
    /// The server answered with a status >= 400.
    HttpStatus,
    /// The body did not match the expected schema.
    DecodeError,
    /// An event boundary was neither a timestamp nor a date.
    DateFormat,
    /// The caller cancelled the operation.
    Cancelled,
    /// The caller's deadline elapsed.
    DeadlineExceeded,
    /// A URL could not be built from the configuration.
    InvalidUrl,
}

impl ApiErrorCode {
    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransportError => "transport_error",
            Self::HttpStatus => "http_status",
            Self::DecodeError => "decode_error",
            Self::DateFormat => "date_format",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::InvalidUrl => "invalid_url",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned by a client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("{operation}: request to {url} failed: {source}")]
    Transport {
        operation: &'static str,
        url: Url,
        #[source]
        source: TransportError,
    },

    /// The server rejected the request. The body is not kept.
    #[error(
        "{operation}: url={url} returned status={} {}",
        .status.as_u16(),
        .status.canonical_reason().unwrap_or("")
    )]
    Status {
        operation: &'static str,
        url: Url,
        status: StatusCode,
    },

    /// A success response whose body did not match the expected shape.
    #[error("{operation}: could not decode response from {url}: {source}; body={body}")]
    Decode {
        operation: &'static str,
        url: Url,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// An event carried an unusable start or end value.
    #[error(transparent)]
    DateFormat(#[from] NormalizeError),

    /// The caller's cancellation signal fired.
    #[error("{operation}: request to {url} was cancelled")]
    Cancelled { operation: &'static str, url: Url },

    /// The caller's deadline passed before the call finished.
    #[error("{operation}: request to {url} exceeded its deadline")]
    DeadlineExceeded { operation: &'static str, url: Url },

    /// The configured base URL or a pagination link is not a valid URL.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    /// Returns the error code.
    pub fn code(&self) -> ApiErrorCode {
        match self {
            Self::Transport { .. } => ApiErrorCode::TransportError,
            Self::Status { .. } => ApiErrorCode::HttpStatus,
            Self::Decode { .. } => ApiErrorCode::DecodeError,
            Self::DateFormat(_) => ApiErrorCode::DateFormat,
            Self::Cancelled { .. } => ApiErrorCode::Cancelled,
            Self::DeadlineExceeded { .. } => ApiErrorCode::DeadlineExceeded,
            Self::InvalidUrl { .. } => ApiErrorCode::InvalidUrl,
        }
    }

    /// Returns the HTTP status for [`ApiError::Status`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the requested URL, when the error is tied to a request.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::Cancelled { url, .. }
            | Self::DeadlineExceeded { url, .. } => Some(url),
            Self::DateFormat(_) | Self::InvalidUrl { .. } => None,
        }
    }

    /// Returns the raw body for [`ApiError::Decode`].
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the operation that failed, if known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Cancelled { operation, .. }
            | Self::DeadlineExceeded { operation, .. } => Some(operation),
            Self::DateFormat(_) | Self::InvalidUrl { .. } => None,
        }
    }

    pub(crate) fn interrupted(
        interruption: crate::context::Interrupted,
        operation: &'static str,
        url: Url,
    ) -> Self {
        match interruption {
            crate::context::Interrupted::Cancelled => Self::Cancelled { operation, url },
            crate::context::Interrupted::DeadlineExceeded => {
                Self::DeadlineExceeded { operation, url }
            }
        }
    }
}

/// A specialized Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
