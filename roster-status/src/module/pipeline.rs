//! Registration report pipeline
//!
//! authorize → fetch → parse → classify → pack → publish, once per run,
//! strictly in that order.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;

use super::publisher::{publish_blocks, MessageSink, PublishOutcome, WebhookClient};
use super::report::render_report;
use super::roster::{parse_roster, HttpRosterFetcher, RosterSource};
use crate::config::{process_env, EnvLookup, ReportConfig};
use crate::error::{ReportError, Result};

/// Accept only an exact, case-sensitive match. An unset configured secret
/// never matches.
pub fn authorize(provided: Option<&str>, configured: Option<&str>) -> Result<()> {
    match (provided, configured) {
        (Some(provided), Some(configured)) if provided == configured => Ok(()),
        _ => Err(ReportError::InvalidSecret),
    }
}

/// What a run did, for the trigger response and the logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub as_of: DateTime<Utc>,
    /// Every non-blank entrant row, shown or not
    pub entrant_count: usize,
    pub blocks: usize,
    pub publish: PublishOutcome,
}

impl ReportSummary {
    /// Two-line body returned to the trigger caller.
    pub fn diagnostic_body(&self) -> String {
        format!(
            "Last updated: {}\nPlayers: {}",
            self.as_of.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.entrant_count
        )
    }
}

/// Runs the whole report. Holds no state between runs; configuration is
/// re-read from `env` every time.
#[derive(Clone)]
pub struct RegistrationReportPublisher {
    env: EnvLookup,
    source: Arc<dyn RosterSource>,
    sink: Arc<dyn MessageSink>,
}

impl RegistrationReportPublisher {
    pub fn new(env: EnvLookup, source: Arc<dyn RosterSource>, sink: Arc<dyn MessageSink>) -> Self {
        Self { env, source, sink }
    }

    /// Production wiring: process environment, one shared HTTP client.
    pub fn from_env() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("roster-status/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(
            process_env(),
            Arc::new(HttpRosterFetcher::new(client.clone())),
            Arc::new(WebhookClient::new(client)),
        ))
    }

    /// Entry point for an external trigger carrying `secret`.
    pub async fn handle_trigger(&self, secret: Option<&str>) -> Result<ReportSummary> {
        let config = ReportConfig::load(self.env.as_ref());
        authorize(secret, config.secret.as_deref())?;
        config.validate()?;
        self.publish(&config).await
    }

    /// Entry point for the internal scheduler, which needs no secret.
    pub async fn run_scheduled(&self) -> Result<ReportSummary> {
        let config = ReportConfig::load(self.env.as_ref());
        config.validate()?;
        self.publish(&config).await
    }

    async fn publish(&self, config: &ReportConfig) -> Result<ReportSummary> {
        let text = self.source.fetch(&config.roster_url).await?;
        let roster = parse_roster(&text)?;
        let blocks = render_report(&roster);
        let block_count = blocks.len();

        tracing::info!(
            "Roster as of {}: {} entrants, {} blocks for {} messages",
            roster.header.as_of.format("%Y-%m-%d"),
            roster.entrant_count(),
            block_count,
            config.message_ids.len()
        );

        let publish = publish_blocks(
            self.sink.as_ref(),
            &config.publish_base_url,
            &config.message_ids,
            blocks,
        )
        .await?;

        tracing::info!(
            "Report published: {} messages edited, {} blocks dropped",
            publish.edited,
            publish.dropped
        );

        Ok(ReportSummary {
            as_of: roster.header.as_of,
            entrant_count: roster.entrant_count(),
            blocks: block_count,
            publish,
        })
    }
}
