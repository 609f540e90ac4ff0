//! In-memory fakes for the roster source and message sink, plus a loopback
//! HTTP server for exercising the real clients

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::Router;
use reqwest::Client;
use std::sync::Mutex;
use tokio::net::TcpListener;

use super::publisher::MessageSink;
use super::roster::RosterSource;

/// Export as of 01/06/2024 with one active, one upcoming and one stale entrant
pub const SAMPLE_SHEET: &str = "Registration export\n\
    \t\t\t\t\t\t\tLast updated\t01/06/2024\n\
    Alice\tA\t01/05/2024\t01/07/2024\n\
    Bob\tB\t01/07/2024\t01/08/2024\n\
    Carl\tC\t01/01/2024\t01/02/2024\n";

/// Serves a fixed body, or fails like a dead connection when built with `unreachable`.
pub struct StaticRoster {
    body: Option<String>,
}

impl StaticRoster {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: Some(body.into()) }
    }

    pub fn unreachable() -> Self {
        Self { body: None }
    }
}

#[async_trait]
impl RosterSource for StaticRoster {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.body
            .clone()
            .ok_or_else(|| anyhow!("connection refused fetching {}", url))
    }
}

/// Records successful edits as `(message_id, content)` and answers `ok:<id>`.
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<(String, String)>>,
    fail_on: Option<String>,
}

impl RecordingSink {
    pub fn failing_on(message_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(message_id.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn edit_message(&self, _base_url: &str, message_id: &str, content: &str) -> Result<String> {
        if self.fail_on.as_deref() == Some(message_id) {
            return Err(anyhow!("connection reset editing message {}", message_id));
        }
        self.calls
            .lock()
            .unwrap()
            .push((message_id.to_string(), content.to_string()));
        Ok(format!("ok:{}", message_id))
    }
}

/// Serve `app` on an ephemeral loopback port; returns `http://127.0.0.1:<port>`.
pub async fn serve_local(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Client that talks to loopback servers directly, whatever proxy the host sets
pub fn local_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}
