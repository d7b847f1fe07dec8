// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use docpoc::commands::agent::{AgentSession, Flow, GREETING};
use docpoc::prompt::ScriptedPrompt;
use docpoc::repl::{self, ReplCommand};
use docpoc_sdk::AgentClient;
use mockito::Matcher;
use serde_json::json;

fn session(url: String, token: Option<&str>) -> AgentSession {
    let mut client = AgentClient::new(url).unwrap();
    if let Some(token) = token {
        client = client.with_token(token);
    }
    AgentSession::new(client)
}

#[tokio::test]
async fn test_startup_fails_when_api_is_down() {
    let err = session("http://127.0.0.1:1".to_string(), None)
        .startup_greeting()
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Could not connect to API"));
    assert!(message.contains("http://127.0.0.1:1"));
}

#[tokio::test]
async fn test_startup_rejects_bad_token() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/health").with_status(200).create_async().await;
    server
        .mock("POST", "/agent/qa")
        .match_header("authorization", "Bearer wrong")
        .with_status(401)
        .with_body(r#"{"detail":"Invalid token"}"#)
        .create_async()
        .await;

    let err = session(server.url(), Some("wrong"))
        .startup_greeting()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn test_startup_with_token_greets_once() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/health").with_status(200).create_async().await;
    let qa = server
        .mock("POST", "/agent/qa")
        .match_body(Matcher::PartialJson(json!({
            "question": GREETING,
            "session_id": "cli-session"
        })))
        .with_status(200)
        .with_body(r#"{"answer":"I can answer questions about your documents."}"#)
        .expect(1)
        .create_async()
        .await;

    session(server.url(), Some("tok"))
        .startup_greeting()
        .await
        .unwrap();
    qa.assert_async().await;
}

#[tokio::test]
async fn test_startup_without_token_still_greets() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/health").with_status(200).create_async().await;
    let qa = server
        .mock("POST", "/agent/qa")
        .with_status(401)
        .create_async()
        .await;

    // An unauthorized greeting is reported, not fatal.
    session(server.url(), None).startup_greeting().await.unwrap();
    qa.assert_async().await;
}

#[tokio::test]
async fn test_document_commands_need_a_token() {
    let mut server = mockito::Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let deletes = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let session = session(server.url(), None);
    for line in ["docs", "summary:d1", "topics:d1", "delete:a.pdf", "upload:/tmp/a.pdf"] {
        assert_eq!(session.execute(repl::parse(line)).await, Flow::Continue);
    }

    any.assert_async().await;
    deletes.assert_async().await;
}

#[tokio::test]
async fn test_scoped_question_sends_doc_id() {
    let mut server = mockito::Server::new_async().await;
    let qa = server
        .mock("POST", "/agent/qa")
        .match_body(Matcher::Json(json!({
            "question": "What is this about?",
            "session_id": "cli-session",
            "doc_id": "d1"
        })))
        .with_status(200)
        .with_body(r#"{"answer":"Invoices.","doc_id":"d1"}"#)
        .create_async()
        .await;

    let session = session(server.url(), None);
    session
        .execute(repl::parse("doc:d1 What is this about?"))
        .await;
    qa.assert_async().await;
}

#[tokio::test]
async fn test_summary_uses_requested_length() {
    let mut server = mockito::Server::new_async().await;
    let summary = server
        .mock("GET", "/agent/docs/d1/summary")
        .match_query(Matcher::UrlEncoded("length".into(), "300".into()))
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(r#"{"summary":"Short."}"#)
        .create_async()
        .await;

    session(server.url(), Some("tok"))
        .execute(ReplCommand::Summary {
            doc_id: "d1".to_string(),
            length: 300,
        })
        .await;
    summary.assert_async().await;
}

#[tokio::test]
async fn test_upload_sends_local_file() {
    let mut server = mockito::Server::new_async().await;
    let upload = server
        .mock("POST", "/agent/docs")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Regex(r#"filename="report.txt""#.to_string()))
        .with_status(200)
        .with_body(r#"{"file_path":"/watch/report.txt","status":"uploaded"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");
    std::fs::write(&path, "quarterly numbers").unwrap();

    session(server.url(), Some("tok"))
        .execute(ReplCommand::Upload(path.display().to_string()))
        .await;
    upload.assert_async().await;
}

#[tokio::test]
async fn test_loop_runs_until_quit() {
    let mut server = mockito::Server::new_async().await;
    let docs = server
        .mock("GET", "/docs")
        .with_status(200)
        .with_body(r#"{"documents":[{"id":"d1","filename":"a.pdf"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let mut prompt = ScriptedPrompt::new(["", "help", "docs", "quit", "docs"]);
    session(server.url(), Some("tok"))
        .interactive_loop(&mut prompt)
        .await
        .unwrap();

    docs.assert_async().await;
    assert_eq!(prompt.remaining(), 1);
}

#[tokio::test]
async fn test_loop_ends_at_end_of_input() {
    let server = mockito::Server::new_async().await;
    let mut prompt = ScriptedPrompt::new(["clear"]);
    session(server.url(), None)
        .interactive_loop(&mut prompt)
        .await
        .unwrap();
    assert_eq!(prompt.remaining(), 0);
}

#[tokio::test]
async fn test_delete_keeps_special_characters_in_filename() {
    let mut server = mockito::Server::new_async().await;
    let wrong = server
        .mock("DELETE", "/agent/docs/report")
        .expect(0)
        .create_async()
        .await;
    let right = server
        .mock("DELETE", "/agent/docs/report%231.pdf")
        .with_status(200)
        .with_body(r#"{"status":"deleted"}"#)
        .expect(1)
        .create_async()
        .await;

    session(server.url(), Some("tok"))
        .execute(repl::parse("delete:report#1.pdf"))
        .await;

    right.assert_async().await;
    wrong.assert_async().await;
}
