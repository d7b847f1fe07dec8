// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Terminal rendering shared by the admin and agent commands

use chrono::{DateTime, NaiveDateTime};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{ContentArrangement, Table};

use docpoc_sdk::{QaEntry, QaResponse, User};

const CELL_LIMIT: usize = 50;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn separator() -> String {
    "-".repeat(40)
}

pub fn header() -> String {
    let rule = "=".repeat(60);
    format!("{rule}\n🤖  LLM Document PoC CLI  🤖\n{rule}\n")
}

/// Cut `text` to `limit` characters, marking the cut with `...`.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Reformat ISO-8601 timestamps as `YYYY-MM-DD HH:MM:SS`; anything else is shown as-is.
pub fn format_timestamp(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return dt.format(TIMESTAMP_FORMAT).to_string();
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return dt.format(TIMESTAMP_FORMAT).to_string();
            }
            s.clone()
        }
        other => other.to_string(),
    }
}

pub fn history_table(history: &[QaEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec!["#", "Question", "Answer", "Timestamp"]);

    for (i, qa) in history.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            truncate(&qa.question, CELL_LIMIT),
            truncate(&qa.answer, CELL_LIMIT),
            format_timestamp(&qa.timestamp),
        ]);
    }

    table
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

pub fn user_card(user: &User) -> String {
    [
        "👤 User Information:".to_string(),
        format!("   ID: {}", user.user_id),
        format!("   Email: {}", user.email),
        format!("   Name: {}", user.name),
        format!(
            "   Token Valid: {}",
            if user.token_valid { "✅" } else { "❌" }
        ),
        format!("   Token Expires: {}", or_none(&user.token_expires)),
        format!("   History Items: {}", user.history_count),
        format!("   Created: {}", or_none(&user.created_at)),
        format!("   Updated: {}", or_none(&user.updated_at)),
    ]
    .join("\n")
}

pub fn agent_response(response: &QaResponse) -> String {
    let mut lines = vec![separator(), "🤖 Agent Response:".to_string()];
    if let Some(doc_id) = &response.doc_id {
        lines.push(format!("📄 Document: {}", doc_id));
    }
    if let Some(session_id) = &response.session_id {
        lines.push(format!("🔗 Session: {}", session_id));
    }
    lines.push(String::new());
    lines.push(response.answer_text().to_string());
    lines.push(separator());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 50), "short");
        let long = "é".repeat(51);
        let cut = truncate(&long, 50);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 53);
        assert_eq!(truncate(&"a".repeat(50), 50).len(), 50);
    }

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(
            format_timestamp(&json!("2025-03-04T05:06:07Z")),
            "2025-03-04 05:06:07"
        );
        assert_eq!(
            format_timestamp(&json!("2025-03-04T05:06:07.123456")),
            "2025-03-04 05:06:07"
        );
        assert_eq!(format_timestamp(&json!("yesterday")), "yesterday");
        assert_eq!(format_timestamp(&json!(1700000000)), "1700000000");
        assert_eq!(format_timestamp(&serde_json::Value::Null), "");
    }

    #[test]
    fn test_history_table_rows() {
        let entries = vec![QaEntry {
            question: "q".repeat(60),
            answer: "short answer".to_string(),
            timestamp: json!("2025-01-01T00:00:00+00:00"),
        }];
        let rendered = history_table(&entries).to_string();

        assert!(rendered.contains("Question"));
        assert!(rendered.contains(&format!("{}...", "q".repeat(50))));
        assert!(rendered.contains("2025-01-01 00:00:00"));
        assert!(rendered.contains("short answer"));
    }

    #[test]
    fn test_agent_response_omits_missing_ids() {
        let rendered = agent_response(&QaResponse {
            answer: Some("42".to_string()),
            doc_id: None,
            session_id: Some("cli-session".to_string()),
        });
        assert!(!rendered.contains("Document:"));
        assert!(rendered.contains("🔗 Session: cli-session"));
        assert!(rendered.contains("42"));
    }
}
