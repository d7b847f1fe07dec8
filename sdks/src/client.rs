// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::endpoint;
use crate::error::{ApiError, Result};
use crate::types::{DeleteResult, DocumentList, QaRequest, QaResponse, Summary, Topics, UploadResult};

pub const DEFAULT_AGENT_URL: &str = "http://localhost:8000";
pub const SESSION_ID: &str = "cli-session";
pub const DEFAULT_SUMMARY_LENGTH: u32 = 150;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const LONG_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Agent API (question answering and document management).
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
    base: Url,
    session_id: String,
    token: Option<String>,
    timeout: Duration,
}

impl AgentClient {
    /// Create a new client. A trailing `/` on `base_url` is ignored.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = endpoint::parse_base(&base_url)?;
        // Timeouts are set per request; answers and uploads need longer than lookups.
        let client = Client::builder().build().map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url,
            base,
            session_id: SESSION_ID.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the timeout used for plain lookups.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, segments: &[&str]) -> Url {
        endpoint::join(&self.base, segments)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|source| ApiError::Connection {
                base_url: self.base_url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(%status, url = %response.url(), "agent api response");

        if !status.is_success() {
            return Err(ApiError::from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Check if the API is available. Only HTTP 200 counts as healthy.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.url(&["health"]))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!("Agent API health check failed: {}", e);
                false
            }
        }
    }

    /// Send a question to the QA endpoint, optionally scoped to one document.
    pub async fn ask_question(&self, question: &str, doc_id: Option<&str>) -> Result<QaResponse> {
        let payload = QaRequest {
            question: question.to_string(),
            session_id: self.session_id.clone(),
            doc_id: doc_id.map(str::to_string),
        };

        self.send(
            self.client
                .post(self.url(&["agent", "qa"]))
                .json(&payload)
                .timeout(LONG_TIMEOUT),
        )
        .await
    }

    pub async fn list_documents(&self) -> Result<DocumentList> {
        self.send(
            self.client
                .get(self.url(&["docs"]))
                .timeout(self.timeout),
        )
        .await
    }

    /// Upload a local file as multipart field `file`.
    pub async fn upload_document(&self, path: &Path) -> Result<UploadResult> {
        let data = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(ApiError::Client)?;
        let form = Form::new().part("file", part);

        self.send(
            self.client
                .post(self.url(&["agent", "docs"]))
                .multipart(form)
                .timeout(LONG_TIMEOUT),
        )
        .await
    }

    /// Delete a document from the watch folder.
    pub async fn delete_document(&self, filename: &str) -> Result<DeleteResult> {
        self.send(
            self.client
                .delete(self.url(&["agent", "docs", filename]))
                .timeout(self.timeout),
        )
        .await
    }

    pub async fn get_document_summary(&self, doc_id: &str, length: u32) -> Result<Summary> {
        self.send(
            self.client
                .get(self.url(&["agent", "docs", doc_id, "summary"]))
                .query(&[("length", length)])
                .timeout(LONG_TIMEOUT),
        )
        .await
    }

    pub async fn get_document_topics(&self, doc_id: &str) -> Result<Topics> {
        self.send(
            self.client
                .get(self.url(&["agent", "docs", doc_id, "topics"]))
                .timeout(self.timeout),
        )
        .await
    }
}
