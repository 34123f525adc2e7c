//! AI endpoints: hosted-model results when the backend answers, heuristic
//! fallback otherwise, never an error.

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use common::{spawn_server, spawn_server_with, TestServer, ALICE, BOB};
use serde_json::{json, Value};
use takenote_inference::{AiService, MockAnalysisBackend};

const LONG_CONTENT: &str = "The cat sat. The cat ran fast. Dogs bark loudly at night. \
    The cat slept on the warm mat after dinner.";

async fn post(server: &TestServer, path: &str) -> (u16, Value) {
    let resp = server
        .client
        .post(server.url(path))
        .bearer_auth(ALICE)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn with_backend(backend: MockAnalysisBackend) -> TestServer {
    let ai = AiService::new(Arc::new(backend), Duration::from_secs(5));
    spawn_server_with(&HashMap::new(), ai).await
}

#[tokio::test]
async fn test_summary_falls_back_without_backend() {
    let server = spawn_server().await;
    let note = server.create_note(ALICE, "Cats", LONG_CONTENT).await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = post(&server, &format!("/notes/{}/ai/summary?sentences=2", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["model"], "fallback_sentence_scoring");
    assert!(!body["summary"].as_str().unwrap().is_empty());
    assert!(body["summary_length"].as_u64().unwrap() <= body["original_length"].as_u64().unwrap());
}

#[tokio::test]
async fn test_short_note_summary_is_passthrough() {
    let server = spawn_server().await;
    let note = server.create_note(ALICE, "Todo", "Call mom").await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = post(&server, &format!("/notes/{}/ai/summary", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["model"], "passthrough_short_content");
    assert_eq!(body["summary"], "Todo. Call mom");
}

#[tokio::test]
async fn test_negative_counts_are_clamped() {
    let server = spawn_server().await;
    let note = server.create_note(ALICE, "Cats", LONG_CONTENT).await;
    let id = note["id"].as_str().unwrap();

    let (status, _) = post(&server, &format!("/notes/{}/ai/summary?sentences=-3", id)).await;
    assert_eq!(status, 200);

    let (status, body) = post(&server, &format!("/notes/{}/ai/tags?limit=-1", id)).await;
    assert_eq!(status, 200);
    assert!(body["tags"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_tags_fall_back_to_keywords() {
    let server = spawn_server().await;
    let note = server
        .create_note(
            ALICE,
            "Deploy",
            "deploy the server, deploy the database, check the server logs",
        )
        .await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = post(&server, &format!("/notes/{}/ai/tags?limit=2", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["model"], "fallback_keywords");
    assert_eq!(body["tags"], json!(["deploy", "server"]));
    assert_eq!(body["confidence_scores"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_category_falls_back_to_rules() {
    let server = spawn_server().await;
    let note = server
        .create_note(ALICE, "Sprint", "Project meeting with the client before the deadline")
        .await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = post(&server, &format!("/notes/{}/ai/category", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["model"], "fallback_rules");
    assert_eq!(body["categories"][0], "work");
}

#[tokio::test]
async fn test_process_returns_all_three() {
    let server = spawn_server().await;
    let note = server.create_note(ALICE, "Cats", LONG_CONTENT).await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = post(&server, &format!("/notes/{}/ai/process", id)).await;
    assert_eq!(status, 200);
    assert!(body["summary"]["summary"].is_string());
    assert!(body["tags"]["tags"].is_array());
    assert!(body["category"]["categories"].is_array());
    assert!(body["processed_at"].is_string());
}

#[tokio::test]
async fn test_ai_on_foreign_note_is_404() {
    let server = spawn_server().await;
    let note = server.create_note(BOB, "Bob's", LONG_CONTENT).await;
    let id = note["id"].as_str().unwrap();

    for op in ["summary", "tags", "category", "process"] {
        let (status, _) = post(&server, &format!("/notes/{}/ai/{}", id, op)).await;
        assert_eq!(status, 404, "op {}", op);
    }
}

#[tokio::test]
async fn test_backend_results_are_used() {
    let server = with_backend(MockAnalysisBackend::new()).await;
    let note = server.create_note(ALICE, "Cats", LONG_CONTENT).await;
    let id = note["id"].as_str().unwrap();

    let (_, body) = post(&server, &format!("/notes/{}/ai/summary", id)).await;
    assert_eq!(body["fallback"], false);
    assert_eq!(body["model"], "mock-summarizer");
    assert_eq!(body["summary"], "Mock summary of the note.");

    let (_, body) = post(&server, &format!("/notes/{}/ai/category", id)).await;
    assert_eq!(body["model"], "mock-classifier");
    assert_eq!(body["categories"][0], "joy");
}

#[tokio::test]
async fn test_failing_backend_falls_back() {
    let server = with_backend(MockAnalysisBackend::failing()).await;
    let note = server.create_note(ALICE, "Cats", LONG_CONTENT).await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = post(&server, &format!("/notes/{}/ai/summary", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["model"], "fallback_sentence_scoring");

    let (status, body) = post(&server, &format!("/notes/{}/ai/tags", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["model"], "fallback_keywords");
}

async fn search(server: &TestServer, body: Value) -> (u16, Value) {
    let resp = server
        .client
        .post(server.url("/notes/ai/search"))
        .bearer_auth(ALICE)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_semantic_search_lexical_fallback_is_scoped() {
    let server = spawn_server().await;
    server
        .create_note(ALICE, "Weekly sync", "urgent meeting scheduled with the team")
        .await;
    server.create_note(ALICE, "Groceries", "milk eggs bread").await;
    server
        .create_note(BOB, "Bob's sync", "urgent meeting about the budget")
        .await;

    let (status, body) = search(&server, json!({ "query": "urgent meeting" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["model"], "lexical_similarity");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Weekly sync");
    let score = results[0]["similarity_score"].as_f64().unwrap();
    assert!(score > 0.0 && score <= 1.0);
}

#[tokio::test]
async fn test_semantic_search_short_query_is_empty() {
    let server = spawn_server().await;
    server.create_note(ALICE, "ab", "ab ab ab").await;

    let (status, body) = search(&server, json!({ "query": "ab" })).await;
    assert_eq!(status, 200);
    assert!(body["results"].as_array().unwrap().is_empty());
    assert_eq!(body["total_matches"], 0);
}

#[tokio::test]
async fn test_semantic_search_uses_backend_scores() {
    let server = with_backend(MockAnalysisBackend::new()).await;
    server.create_note(ALICE, "First", "alpha").await;
    server.create_note(ALICE, "Second", "beta").await;

    let (status, body) = search(&server, json!({ "query": "anything at all", "limit": 1 })).await;
    assert_eq!(status, 200);
    assert_eq!(body["fallback"], false);
    assert_eq!(body["model"], "mock-similarity");
    assert_eq!(body["total_matches"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    // newest note is first in the corpus and scores highest
    assert_eq!(body["results"][0]["title"], "Second");
}

#[tokio::test]
async fn test_semantic_search_validation() {
    let server = spawn_server().await;

    let (status, _) = search(&server, json!({ "query": "q".repeat(101) })).await;
    assert_eq!(status, 422);

    let (status, _) = search(&server, json!({ "query": "meeting", "limit": 1000 })).await;
    assert_eq!(status, 422);
}
