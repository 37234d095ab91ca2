//! Shared request plumbing for the auth and task clients

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// Helper function to join URL segments properly
pub(crate) fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Check the response status, mapping non-success to [`ApiError::Status`]
/// with the body text as the message.
pub(crate) async fn expect_success(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::status(status, message))
    }
}

/// Check the status, then parse the body as JSON. Parse failures on a
/// successful status become [`ApiError::Decode`].
pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let response = expect_success(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://host:3000", "tasks"), "http://host:3000/tasks");
        assert_eq!(join_url("http://host:3000/", "/tasks"), "http://host:3000/tasks");
        assert_eq!(join_url("http://host:3000/", ""), "http://host:3000");
    }
}
