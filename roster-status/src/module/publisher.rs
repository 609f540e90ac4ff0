//! Publishes report blocks by editing pre-created chat messages.
//!
//! Each configured message ID receives exactly one edit, in order. Extra
//! blocks are dropped; missing blocks are replaced with a placeholder.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Content sent to message slots that have no block left
pub const PLACEHOLDER: &str = "-";

/// Edits an existing message on the chat side
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Replace the content of `message_id`. Returns the raw response body.
    async fn edit_message(&self, base_url: &str, message_id: &str, content: &str) -> Result<String>;
}

#[derive(Serialize, Debug)]
struct EditMessageRequest<'a> {
    content: &'a str,
}

/// Webhook-backed [`MessageSink`]: `PATCH <base>/messages/<id>`.
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn message_url(base_url: &str, message_id: &str) -> String {
        format!("{}/messages/{}", base_url.trim_end_matches('/'), message_id)
    }
}

#[async_trait]
impl MessageSink for WebhookClient {
    async fn edit_message(&self, base_url: &str, message_id: &str, content: &str) -> Result<String> {
        let resp = self
            .client
            .patch(Self::message_url(base_url, message_id))
            .json(&EditMessageRequest { content })
            .send()
            .await
            .with_context(|| format!("Failed to PATCH message {}", message_id))?;

        // Rejected edits are not fatal, the remaining slots still get updated
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Edit of message {} answered HTTP {}", message_id, status);
        }

        resp.text()
            .await
            .with_context(|| format!("Failed to read response for message {}", message_id))
    }
}

/// Result of one publishing pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Number of edits sent (always the number of message IDs)
    pub edited: usize,
    /// Blocks that had no message slot
    pub dropped: usize,
    /// Concatenated response bodies, informational only
    pub diagnostics: String,
}

/// Send `blocks` to `message_ids`, one awaited edit at a time.
pub async fn publish_blocks(
    sink: &dyn MessageSink,
    base_url: &str,
    message_ids: &[String],
    blocks: Vec<String>,
) -> Result<PublishOutcome> {
    let mut blocks = blocks.into_iter();
    let mut outcome = PublishOutcome::default();

    for message_id in message_ids {
        let content = blocks.next().unwrap_or_else(|| PLACEHOLDER.to_string());
        tracing::debug!("Editing message {} ({} chars)", message_id, content.chars().count());

        let body = sink.edit_message(base_url, message_id, &content).await?;
        outcome.diagnostics.push_str(&body);
        outcome.edited += 1;
    }

    outcome.dropped = blocks.count();
    if outcome.dropped > 0 {
        tracing::debug!("{} blocks had no message slot and were dropped", outcome.dropped);
    }
    tracing::debug!("Publish responses: {}", outcome.diagnostics);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::testing::{local_client, serve_local, RecordingSink};
    use axum::extract::{Path, State};
    use axum::http::{header, HeaderMap, Method, StatusCode};
    use axum::routing::any;
    use axum::Router;
    use std::sync::{Arc, Mutex};

    /// Request as seen by the chat server
    #[derive(Debug, Clone)]
    struct SeenEdit {
        method: Method,
        message_id: String,
        content_type: Option<String>,
        body: serde_json::Value,
    }

    type SeenEdits = Arc<Mutex<Vec<SeenEdit>>>;

    /// Message "404" is unknown and "500" breaks the server; every reply names the message.
    async fn chat_server(
        State(seen): State<SeenEdits>,
        method: Method,
        Path(message_id): Path<String>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let status = match message_id.as_str() {
            "404" => StatusCode::NOT_FOUND,
            "500" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };
        seen.lock().unwrap().push(SeenEdit {
            method,
            message_id: message_id.clone(),
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
        });
        (status, format!("[{} {}]", status.as_u16(), message_id))
    }

    async fn start_chat_server() -> (String, SeenEdits) {
        let seen = SeenEdits::default();
        let app = Router::new()
            .route("/api/webhooks/7/tok/messages/{message_id}", any(chat_server))
            .with_state(seen.clone());
        let base = serve_local(app).await;
        (format!("{}/api/webhooks/7/tok/", base), seen)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn blocks(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("block {}", i)).collect()
    }

    #[test]
    fn test_message_url() {
        assert_eq!(
            WebhookClient::message_url("https://chat.example/api/webhooks/1/tok", "42"),
            "https://chat.example/api/webhooks/1/tok/messages/42"
        );
        assert_eq!(
            WebhookClient::message_url("https://chat.example/hook/", "42"),
            "https://chat.example/hook/messages/42"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(EditMessageRequest { content: "a \"quoted\"\nline" }).unwrap();
        assert_eq!(body, serde_json::json!({ "content": "a \"quoted\"\nline" }));
    }

    #[tokio::test]
    async fn test_excess_blocks_are_dropped() {
        let sink = RecordingSink::default();
        let outcome = publish_blocks(&sink, "base", &ids(&["a", "b", "c"]), blocks(5))
            .await
            .unwrap();

        assert_eq!(
            sink.calls(),
            vec![
                ("a".to_string(), "block 1".to_string()),
                ("b".to_string(), "block 2".to_string()),
                ("c".to_string(), "block 3".to_string()),
            ]
        );
        assert_eq!(outcome.edited, 3);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.diagnostics, "ok:aok:bok:c");
    }

    #[tokio::test]
    async fn test_missing_blocks_get_placeholder() {
        let sink = RecordingSink::default();
        let outcome = publish_blocks(&sink, "base", &ids(&["a", "b", "c"]), blocks(1))
            .await
            .unwrap();

        let contents: Vec<String> = sink.calls().into_iter().map(|(_, c)| c).collect();
        assert_eq!(contents, vec!["block 1", PLACEHOLDER, PLACEHOLDER]);
        assert_eq!(outcome.dropped, 0);
    }

    #[tokio::test]
    async fn test_webhook_sends_json_patch() {
        let (webhook_url, seen) = start_chat_server().await;
        let client = WebhookClient::new(local_client());

        let body = client
            .edit_message(&webhook_url, "42", "**Registration Status**\n\"quoted\"")
            .await
            .unwrap();
        assert_eq!(body, "[200 42]");

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::PATCH);
        assert_eq!(seen[0].message_id, "42");
        assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(
            seen[0].body,
            serde_json::json!({ "content": "**Registration Status**\n\"quoted\"" })
        );
    }

    #[tokio::test]
    async fn test_rejected_edits_do_not_stop_publishing() {
        let (webhook_url, seen) = start_chat_server().await;
        let client = WebhookClient::new(local_client());

        let outcome = publish_blocks(&client, &webhook_url, &ids(&["1", "404", "500", "2"]), blocks(2))
            .await
            .unwrap();

        assert_eq!(outcome.edited, 4);
        assert_eq!(outcome.dropped, 0);
        assert_eq!(outcome.diagnostics, "[200 1][404 404][500 500][200 2]");

        let seen = seen.lock().unwrap().clone();
        let edited: Vec<&str> = seen.iter().map(|edit| edit.message_id.as_str()).collect();
        assert_eq!(edited, vec!["1", "404", "500", "2"]);
        assert!(seen.iter().all(|edit| edit.method == Method::PATCH));
        assert_eq!(seen[1].body, serde_json::json!({ "content": "block 2" }));
        assert_eq!(seen[3].body, serde_json::json!({ "content": PLACEHOLDER }));
    }

    #[tokio::test]
    async fn test_transport_error_stops_publishing() {
        let sink = RecordingSink::failing_on("b");
        let err = publish_blocks(&sink, "base", &ids(&["a", "b", "c"]), blocks(3))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("b"));
        assert_eq!(sink.calls().len(), 1);
    }
}
