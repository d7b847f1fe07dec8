// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Types
//!
//! Request and response bodies for the Admin and Agent APIs.
//!
//! Responses tolerate unknown fields and default anything the services may omit
//! or send as `null`.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Admin API
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub token_validity_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub token: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_valid: bool,
    #[serde(default)]
    pub token_expires: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenOwner {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token_expires: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenValidation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid: bool,
    #[serde(default)]
    pub user: Option<TokenOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub new_token: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddQaRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaAdded {
    pub total_history_items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    /// Usually an RFC3339 string, but the service does not guarantee it.
    #[serde(default)]
    pub timestamp: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHistory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<QaEntry>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl UserHistory {
    pub fn total(&self) -> u64 {
        self.total_count.unwrap_or(self.history.len() as u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedUser {
    #[serde(default)]
    pub deleted_user: Option<UserSummary>,
}

// ============================================================================
// Agent API
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QaRequest {
    pub question: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl QaResponse {
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or("No answer received")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(default = "unknown", deserialize_with = "null_as_unknown")]
    pub id: String,
    #[serde(default = "unknown", deserialize_with = "null_as_unknown")]
    pub filename: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteResult {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

/// An explicit `null` counts as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|v| v.unwrap_or_else(unknown))
}
