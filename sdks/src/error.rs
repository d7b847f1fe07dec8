// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Errors returned by the API clients

use std::path::PathBuf;

use reqwest::{Response, StatusCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("API Error ({status}): {detail}")]
    Status { status: u16, detail: String },

    /// The request never produced a response.
    #[error("Connection Error: {source}. Make sure the API is running on {base_url}")]
    Connection {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn is_payload_too_large(&self) -> bool {
        self.status() == Some(StatusCode::PAYLOAD_TOO_LARGE.as_u16())
    }

    /// Build a `Status` error from a failed response, preferring the JSON `detail` field.
    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ApiError::Status {
            status: status.as_u16(),
            detail: extract_detail(status, &body),
        }
    }
}

fn extract_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match &value["detail"] {
            serde_json::Value::String(s) => return s.clone(),
            serde_json::Value::Null => {}
            other => return other.to_string(),
        }
    }

    if !body.trim().is_empty() {
        return body.trim().to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_prefers_json_field() {
        let detail = extract_detail(StatusCode::BAD_REQUEST, r#"{"detail":"Email already registered"}"#);
        assert_eq!(detail, "Email already registered");
    }

    #[test]
    fn test_detail_falls_back_to_body_then_reason() {
        assert_eq!(extract_detail(StatusCode::BAD_GATEWAY, "upstream down\n"), "upstream down");
        assert_eq!(extract_detail(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn test_status_display_and_predicates() {
        let err = ApiError::Status {
            status: 401,
            detail: "Invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "API Error (401): Invalid token");
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());

        let err = ApiError::Status {
            status: 413,
            detail: "too big".to_string(),
        };
        assert!(err.is_payload_too_large());
        assert_eq!(ApiError::Decode("x".into()).status(), None);
    }
}
