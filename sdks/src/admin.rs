// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for the Admin API
//!
//! Every user-scoped call returns `Ok(None)` when the service answers 404, so
//! callers can tell "no such user" apart from a failed request.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::endpoint;
use crate::error::{ApiError, Result};
use crate::types::{
    AddQaRequest, CreateUserRequest, CreatedUser, DeletedUser, QaAdded, RefreshedToken,
    TokenValidation, User, UserHistory,
};

pub const DEFAULT_ADMIN_URL: &str = "http://127.0.0.1:8001";
pub const ADMIN_API_PREFIX: &str = "admin";
pub const DEFAULT_TOKEN_HOURS: u32 = 24;
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    base: Url,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = endpoint::parse_base(&base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/admin/users/{segments...}`
    fn users(&self, segments: &[&str]) -> Url {
        let mut path = vec![ADMIN_API_PREFIX, "users"];
        path.extend_from_slice(segments);
        endpoint::join(&self.base, &path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await.map_err(|source| ApiError::Connection {
            base_url: self.base_url.clone(),
            source,
        })?;

        let status = response.status();
        debug!(%status, url = %response.url(), "admin api response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Best-effort liveness probe against `/health` (outside the `/admin` prefix).
    pub async fn health(&self) -> bool {
        match self
            .client
            .get(endpoint::join(&self.base, &["health"]))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Admin API health check failed: {}", e);
                false
            }
        }
    }

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        token_hours: u32,
    ) -> Result<Option<CreatedUser>> {
        let body = CreateUserRequest {
            email: email.to_string(),
            name: name.to_string(),
            token_validity_hours: token_hours,
        };
        self.send(self.client.post(self.users(&[""])).json(&body))
            .await
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.send(self.client.get(self.users(&[user_id])))
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.send(
            self.client
                .get(self.users(&["by-email", email])),
        )
        .await
    }

    pub async fn validate_token(&self, token: &str) -> Result<Option<TokenValidation>> {
        self.send(
            self.client
                .post(self.users(&["validate-token"]))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn refresh_token(
        &self,
        user_id: &str,
        token_hours: u32,
    ) -> Result<Option<RefreshedToken>> {
        self.send(
            self.client
                .post(self.users(&[user_id, "refresh-token"]))
                .query(&[("token_validity_hours", token_hours)]),
        )
        .await
    }

    pub async fn add_qa(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Option<QaAdded>> {
        let body = AddQaRequest {
            question: question.to_string(),
            answer: answer.to_string(),
        };
        self.send(
            self.client
                .post(self.users(&[user_id, "add-qa"]))
                .json(&body),
        )
        .await
    }

    pub async fn get_user_history(&self, user_id: &str, limit: u32) -> Result<Option<UserHistory>> {
        self.send(
            self.client
                .get(self.users(&[user_id, "history"]))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Option<DeletedUser>> {
        self.send(self.client.delete(self.users(&[user_id])))
            .await
    }

    /// The listing shape is not fixed by the service, so it is returned as raw JSON.
    pub async fn list_users(&self, limit: u32, skip: u32) -> Result<Option<serde_json::Value>> {
        self.send(
            self.client
                .get(self.users(&["list"]))
                .query(&[("limit", limit), ("skip", skip)]),
        )
        .await
    }
}
