//! Classification of raw responses.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::transport::RawResponse;

/// Turns a raw response into `T` or a classified error.
///
/// A status of 400 or above is a [`ApiError::Status`] and the body is
/// discarded. Anything else must deserialize into `T` in full; otherwise the
/// body is kept in [`ApiError::Decode`] for diagnosis.
pub(crate) fn decode<T>(operation: &'static str, url: &Url, response: RawResponse) -> ApiResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status;
    debug!(operation, url = %url, status = status.as_u16(), "response status");

    if status.as_u16() >= 400 {
        return Err(ApiError::Status {
            operation,
            url: url.clone(),
            status,
        });
    }

    serde_json::from_slice(&response.body).map_err(|source| {
        let body = String::from_utf8_lossy(&response.body).into_owned();
        warn!(operation, url = %url, error = %source, "response body did not match schema");
        ApiError::Decode {
            operation,
            url: url.clone(),
            body,
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorCode;
    use reqwest::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Shape {
        name: String,
    }

    fn url() -> Url {
        Url::parse("https://api.cronofy.com/v1/things").unwrap()
    }

    #[test]
    fn success_decodes() {
        let response = RawResponse::new(StatusCode::OK, br#"{"name":"x"}"#.to_vec());
        let shape: Shape = decode("get_things", &url(), response).unwrap();
        assert_eq!(shape, Shape { name: "x".to_string() });
    }

    #[test]
    fn client_error_status_drops_body() {
        let response = RawResponse::new(StatusCode::NOT_FOUND, br#"{"error":"nope"}"#.to_vec());
        let err = decode::<Shape>("get_things", &url(), response).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::HttpStatus);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.url(), Some(&url()));
        assert!(err.body().is_none());
        assert!(!err.to_string().contains("nope"));
    }

    #[test]
    fn server_error_status() {
        let response = RawResponse::new(StatusCode::SERVICE_UNAVAILABLE, Vec::new());
        let err = decode::<Shape>("get_things", &url(), response).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn redirect_status_is_decoded() {
        let response = RawResponse::new(StatusCode::NOT_MODIFIED, br#"{"name":"cached"}"#.to_vec());
        let shape: Shape = decode("get_things", &url(), response).unwrap();
        assert_eq!(shape.name, "cached");
    }

    #[test]
    fn schema_mismatch_keeps_body() {
        let response = RawResponse::new(StatusCode::OK, br#"{"name":42}"#.to_vec());
        let err = decode::<Shape>("get_things", &url(), response).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::DecodeError);
        assert_eq!(err.body(), Some(r#"{"name":42}"#));
        assert_eq!(err.operation(), Some("get_things"));
    }

    #[test]
    fn empty_body_is_decode_error() {
        let response = RawResponse::new(StatusCode::OK, Vec::new());
        let err = decode::<Shape>("get_things", &url(), response).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::DecodeError);
        assert_eq!(err.body(), Some(""));
    }
}
