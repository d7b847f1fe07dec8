// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent REPL command parsing
//!
//! Keywords and `prefix:` commands are matched case-insensitively; the text
//! after a prefix keeps its original case. Anything unrecognised is a question.

use docpoc_sdk::client::DEFAULT_SUMMARY_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Quit,
    Help,
    Documents,
    Clear,
    Upload(String),
    Summary { doc_id: String, length: u32 },
    Topics(String),
    Delete(String),
    Ask {
        question: String,
        doc_id: Option<String>,
    },
    /// Recognised command with bad arguments; carries the usage message.
    Usage(&'static str),
}

pub const UPLOAD_USAGE: &str = "❌ Please provide a file path. Use: upload:/path/to/file";
pub const SUMMARY_USAGE: &str =
    "❌ Please provide a document ID. Use: summary:DOC_ID or summary:DOC_ID:LENGTH";
pub const TOPICS_USAGE: &str = "❌ Please provide a document ID. Use: topics:DOC_ID";
pub const DELETE_USAGE: &str = "❌ Please provide a filename. Use: delete:filename.pdf";
pub const DOC_USAGE: &str = "❌ Invalid format. Use: doc:DOC_ID your question";

fn strip_prefix_ci<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    input
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &input[prefix.len()..])
}

pub fn parse(line: &str) -> ReplCommand {
    let input = line.trim();
    if input.is_empty() {
        return ReplCommand::Empty;
    }

    match input.to_lowercase().as_str() {
        "quit" | "exit" | "q" => return ReplCommand::Quit,
        "help" | "h" => return ReplCommand::Help,
        "docs" | "documents" => return ReplCommand::Documents,
        // Exact match only, so questions such as "clearance levels?" still reach the agent.
        "clear" => return ReplCommand::Clear,
        _ => {}
    }

    if let Some(rest) = strip_prefix_ci(input, "upload:") {
        let path = rest.trim();
        return if path.is_empty() {
            ReplCommand::Usage(UPLOAD_USAGE)
        } else {
            ReplCommand::Upload(path.to_string())
        };
    }

    if let Some(rest) = strip_prefix_ci(input, "summary:") {
        let mut parts = rest.trim().split(':');
        let doc_id = parts.next().unwrap_or_default();
        if doc_id.is_empty() {
            return ReplCommand::Usage(SUMMARY_USAGE);
        }
        let length = parts
            .next()
            .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SUMMARY_LENGTH);
        return ReplCommand::Summary {
            doc_id: doc_id.to_string(),
            length,
        };
    }

    if let Some(rest) = strip_prefix_ci(input, "topics:") {
        let doc_id = rest.trim();
        return if doc_id.is_empty() {
            ReplCommand::Usage(TOPICS_USAGE)
        } else {
            ReplCommand::Topics(doc_id.to_string())
        };
    }

    if let Some(rest) = strip_prefix_ci(input, "delete:") {
        let filename = rest.trim();
        return if filename.is_empty() {
            ReplCommand::Usage(DELETE_USAGE)
        } else {
            ReplCommand::Delete(filename.to_string())
        };
    }

    if let Some(rest) = strip_prefix_ci(input, "doc:") {
        return match rest.trim().split_once(' ') {
            Some((doc_id, question)) if !doc_id.is_empty() && !question.trim().is_empty() => {
                ReplCommand::Ask {
                    question: question.trim().to_string(),
                    doc_id: Some(doc_id.to_string()),
                }
            }
            _ => ReplCommand::Usage(DOC_USAGE),
        };
    }

    ReplCommand::Ask {
        question: input.to_string(),
        doc_id: None,
    }
}

pub fn help_text() -> String {
    let lines = [
        "📖 Help - Available Commands:",
        "",
        "• help, h                    - Show this help message",
        "• docs, documents            - List available documents",
        "• doc:DOC_ID your question   - Ask a question about a specific document",
        "• upload:/path/to/file       - Upload a document",
        "• delete:filename            - Delete a document from the watch folder",
        "• summary:DOC_ID             - Get document summary (150 words)",
        "• summary:DOC_ID:LENGTH      - Get document summary (custom length)",
        "• topics:DOC_ID              - Get document topics",
        "• clear                      - Clear the screen",
        "• quit, exit, q              - Exit the CLI",
        "",
        "Examples:",
        "• What can you do?",
        "• doc:12345 What is this document about?",
        "• upload:/home/user/document.pdf",
        "• delete:document.pdf",
        "• summary:12345",
        "• summary:12345:300",
        "• topics:12345",
        "",
        "Authentication:",
        "• Use --token argument or set APP_API_TOKEN environment variable",
        "• Document operations (upload, delete, summary, topics) require authentication",
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(parse("  QUIT "), ReplCommand::Quit);
        assert_eq!(parse("q"), ReplCommand::Quit);
        assert_eq!(parse("H"), ReplCommand::Help);
        assert_eq!(parse("Documents"), ReplCommand::Documents);
        assert_eq!(parse("clear"), ReplCommand::Clear);
        assert_eq!(parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn test_prefix_arguments_keep_case() {
        assert_eq!(
            parse("Upload: /Home/Me/Report.PDF"),
            ReplCommand::Upload("/Home/Me/Report.PDF".to_string())
        );
        assert_eq!(
            parse("delete:Report.pdf"),
            ReplCommand::Delete("Report.pdf".to_string())
        );
        assert_eq!(parse("topics:AbC"), ReplCommand::Topics("AbC".to_string()));
        assert_eq!(parse("upload:"), ReplCommand::Usage(UPLOAD_USAGE));
        assert_eq!(parse("topics:  "), ReplCommand::Usage(TOPICS_USAGE));
        assert_eq!(parse("delete:"), ReplCommand::Usage(DELETE_USAGE));
    }

    #[test]
    fn test_summary_length_defaults() {
        let summary = |doc_id: &str, length| ReplCommand::Summary {
            doc_id: doc_id.to_string(),
            length,
        };
        assert_eq!(parse("summary:12345"), summary("12345", 150));
        assert_eq!(parse("summary:12345:300"), summary("12345", 300));
        assert_eq!(parse("summary:12345:long"), summary("12345", 150));
        assert_eq!(parse("summary:12345:"), summary("12345", 150));
        assert_eq!(parse("summary:"), ReplCommand::Usage(SUMMARY_USAGE));
    }

    #[test]
    fn test_document_scoped_questions() {
        assert_eq!(
            parse("doc:12345 What is this document about?"),
            ReplCommand::Ask {
                question: "What is this document about?".to_string(),
                doc_id: Some("12345".to_string()),
            }
        );
        assert_eq!(parse("doc:12345"), ReplCommand::Usage(DOC_USAGE));
        assert_eq!(parse("doc: "), ReplCommand::Usage(DOC_USAGE));
    }

    #[test]
    fn test_everything_else_is_a_question() {
        assert_eq!(
            parse("What can you do?"),
            ReplCommand::Ask {
                question: "What can you do?".to_string(),
                doc_id: None,
            }
        );
        assert!(matches!(parse("clearance levels?"), ReplCommand::Ask { .. }));
        assert!(matches!(parse("quitting time"), ReplCommand::Ask { .. }));
    }
}
