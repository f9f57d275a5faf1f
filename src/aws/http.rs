//! HTTP utilities for backend API calls

use crate::error::{AdapterError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Bounded timeout per backend round-trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back the cut off to a char boundary; slicing mid-character panics
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for the SimpleDB query API
#[derive(Clone, Debug)]
pub struct SdbHttpClient {
    client: Client,
}

impl SdbHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("awsgate/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::Backend(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// POST form-encoded action parameters, returning the parsed JSON body.
    ///
    /// Transport failures and timeouts surface as `Backend`; non-2xx
    /// statuses map onto the adapter taxonomy (403 -> Forbidden,
    /// 404 -> NotFound, everything else -> Backend).
    pub async fn post_form(&self, url: &str, params: &[(String, String)]) -> Result<Value> {
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, url, "POST");

        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdapterError::Backend("backend request timed out".into())
                } else {
                    AdapterError::Backend(format!("failed to send request: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::Backend(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking
            // sensitive data
            tracing::error!(%request_id, %status, body = %sanitize_for_log(&body), "backend error");
            return Err(match status.as_u16() {
                403 => AdapterError::Forbidden("backend denied the request".into()),
                404 => AdapterError::NotFound("backend resource not found".into()),
                _ => AdapterError::Backend(format!("backend request failed: {status}")),
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|e| AdapterError::Backend(format!("failed to parse response JSON: {e}")))
    }
}
