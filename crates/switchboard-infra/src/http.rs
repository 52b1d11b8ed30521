//! Shared outbound HTTP plumbing for service adapters.

use std::time::Duration;

use switchboard_types::error::ServiceError;

/// Build the client every adapter shares. `timeout` bounds each request.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Map a transport error. Timeouts keep their own wording for logs.
pub(crate) fn transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Http(format!("request timed out: {err}"))
    } else {
        ServiceError::Http(err.to_string())
    }
}

/// Turn a non-success response into a `ServiceError`.
///
/// 401 and 403 become `AuthenticationFailed`; everything else keeps the
/// status and (truncated) body.
pub(crate) async fn status_error(response: reqwest::Response) -> ServiceError {
    let status = response.status().as_u16();
    if status == 401 || status == 403 {
        return ServiceError::AuthenticationFailed;
    }
    let body = response.text().await.unwrap_or_default();
    ServiceError::Status {
        status,
        body: body.chars().take(512).collect(),
    }
}

/// Decode a successful JSON response body.
pub(crate) async fn json_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    response
        .json()
        .await
        .map_err(|e| ServiceError::Deserialization(e.to_string()))
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
