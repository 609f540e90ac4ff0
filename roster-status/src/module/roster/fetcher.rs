//! Roster export fetcher

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Where the raw roster export comes from
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Return the full export body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches the export over HTTP with a single GET, no timeout and no retry.
pub struct HttpRosterFetcher {
    client: Client,
}

impl HttpRosterFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RosterSource for HttpRosterFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::info!("Fetching roster export from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to GET roster export")?;

        if !response.status().is_success() {
            tracing::warn!("Roster export answered HTTP {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("Failed to read roster export body")?;

        tracing::debug!("Roster export: {} bytes", body.len());
        Ok(body)
    }
}
