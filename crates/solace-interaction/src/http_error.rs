//! HTTP error mapping shared by the hosted backends.
//!
//! Gemini, Claude and OpenAI all wrap failures as `{"error": {"message": ...}}`.

use reqwest::StatusCode;
use serde::Deserialize;
use solace_core::provider::ProviderError;

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub(crate) fn map_http_error(status: StatusCode, body: String) -> ProviderError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    ProviderError::Status {
        status_code: status.as_u16(),
        message,
    }
}

pub(crate) fn map_transport_error(backend: &str, err: reqwest::Error) -> ProviderError {
    ProviderError::Request {
        message: format!("{backend} API request failed: {err}"),
        is_retryable: err.is_connect() || err.is_timeout(),
    }
}

pub(crate) fn build_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("[Provider] Falling back to default HTTP client: {}", err);
            reqwest::Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_extracts_message() {
        let body = r#"{"error": {"type": "overloaded_error", "message": "Overloaded"}}"#;
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, body.to_string());
        assert_eq!(
            err,
            ProviderError::Status {
                status_code: 503,
                message: "Overloaded".to_string()
            }
        );
    }

    #[test]
    fn test_map_http_error_keeps_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream gone".to_string());
        assert_eq!(
            err,
            ProviderError::Status {
                status_code: 502,
                message: "upstream gone".to_string()
            }
        );
    }
}
