//! HTTP plumbing for GCP REST listing calls
//!
//! Every listing goes through [`HttpClient::get_json`], which classifies
//! failures into [`QueryError`]. The report treats every variant as a zero
//! count; the distinction only feeds verbose diagnostics.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// One failed listing query
#[derive(Debug, Error)]
pub enum QueryError {
    /// The service API has not been enabled on the project
    #[error("API not enabled: {0}")]
    ApiDisabled(String),
    /// The caller lacks permission on the project
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Transport failures, server errors, malformed bodies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Sanitize a response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Classify an error response from a GCP API
///
/// GCP reports a disabled API as a 403 whose error detail carries the
/// `accessNotConfigured` or `SERVICE_DISABLED` reason; every other 403 is a
/// plain permission problem.
fn classify_error(status: reqwest::StatusCode, body: &str) -> QueryError {
    let message = parsed_error_message(body).unwrap_or_else(|| format!("HTTP {}", status));

    if status == reqwest::StatusCode::FORBIDDEN {
        if error_has_reason(body, "accessNotConfigured") || error_has_reason(body, "SERVICE_DISABLED")
        {
            return QueryError::ApiDisabled(message);
        }
        return QueryError::PermissionDenied(message);
    }

    QueryError::Other(anyhow::anyhow!("API request failed: {} - {}", status, message))
}

/// Pull the human-readable message out of a GCP error body
fn parsed_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| sanitize_for_log(s))
}

/// Check whether any error detail in the body carries the given reason
fn error_has_reason(body: &str, reason: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let Some(error) = value.get("error") else {
        return false;
    };

    let in_list = |key: &str| {
        error
            .get(key)
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .any(|e| e.get("reason").and_then(|r| r.as_str()) == Some(reason))
            })
            .unwrap_or(false)
    };

    in_list("errors") || in_list("details")
}

/// HTTP client wrapper for GCP listing calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gcptally/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET a JSON document from a GCP API
    pub async fn get_json(&self, url: &str, token: &str) -> Result<Value, QueryError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(classify_error(status, &body));
        }

        let value =
            serde_json::from_str(&body).context("Failed to parse response JSON")?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const DISABLED_BODY: &str = r#"{
        "error": {
            "code": 403,
            "message": "Cloud SQL Admin API has not been used in project 123 before or it is disabled.",
            "errors": [{"domain": "usageLimits", "reason": "accessNotConfigured"}],
            "status": "PERMISSION_DENIED"
        }
    }"#;

    const DENIED_BODY: &str = r#"{
        "error": {
            "code": 403,
            "message": "The caller does not have permission",
            "errors": [{"domain": "global", "reason": "forbidden"}],
            "status": "PERMISSION_DENIED"
        }
    }"#;

    const DISABLED_DETAILS_BODY: &str = r#"{
        "error": {
            "code": 403,
            "message": "Cloud Filestore API has not been used in project 123 before or it is disabled.",
            "status": "PERMISSION_DENIED",
            "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "SERVICE_DISABLED"}]
        }
    }"#;

    #[test]
    fn test_disabled_api_is_classified() {
        let err = classify_error(StatusCode::FORBIDDEN, DISABLED_BODY);
        assert!(matches!(err, QueryError::ApiDisabled(_)));

        let err = classify_error(StatusCode::FORBIDDEN, DISABLED_DETAILS_BODY);
        assert!(matches!(err, QueryError::ApiDisabled(_)));
    }

    #[test]
    fn test_plain_403_is_permission_denied() {
        let err = classify_error(StatusCode::FORBIDDEN, DENIED_BODY);
        assert!(matches!(err, QueryError::PermissionDenied(_)));
    }

    #[test]
    fn test_server_error_is_other() {
        let err = classify_error(StatusCode::INTERNAL_SERVER_ERROR, "backend error");
        assert!(matches!(err, QueryError::Other(_)));
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = classify_error(StatusCode::FORBIDDEN, "<html>forbidden</html>");
        assert!(matches!(err, QueryError::PermissionDenied(_)));
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(5000);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.len() < body.len());
        assert!(sanitized.contains("truncated"));
    }
}
