//! Shared helpers: a real server on an ephemeral port backed by the
//! in-memory note store and a fixed token table.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use takenote_api::{build_router, AppState, Settings};
use takenote_core::AuthUser;
use takenote_db::{MemoryNoteRepository, StaticTokenVerifier};
use takenote_inference::AiService;

pub const ALICE: &str = "alice-token";
pub const BOB: &str = "bob-token";

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub alice: AuthUser,
    pub bob: AuthUser,
}

fn user(email: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
        created_at: None,
        access_token: String::new(),
    }
}

pub async fn spawn_server() -> TestServer {
    spawn_server_with(&HashMap::new(), AiService::disabled()).await
}

pub async fn spawn_server_with(vars: &HashMap<&str, &str>, ai: AiService) -> TestServer {
    let alice = user("alice@example.com");
    let bob = user("bob@example.com");
    let auth = StaticTokenVerifier::new()
        .with_user(ALICE, alice.clone())
        .with_user(BOB, bob.clone());

    let state = AppState::new(
        Arc::new(MemoryNoteRepository::new()),
        Arc::new(auth),
        ai,
        Settings::from_map(vars),
    );
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    // Give server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        alice,
        bob,
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn create_note(&self, token: &str, title: &str, content: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/notes"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        resp.json().await.unwrap()
    }
}
