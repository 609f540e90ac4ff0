//! Scheduled report publishing
//!
//! Runs the report on wall-clock slots at whole multiples of the configured
//! interval since the Unix epoch. Intervals that divide a day therefore line
//! up with midnight UTC (every 15 minutes → xx:00, xx:15, xx:30, xx:45), and
//! longer ones keep an even spacing across days.
//! A failed run is logged and the next slot is awaited; there is no retry.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::pipeline::RegistrationReportPublisher;

/// Configuration for scheduled publishing
#[derive(Debug, Clone)]
pub struct ScheduledTaskConfig {
    /// Minutes between runs; 0 disables the schedule
    pub interval_minutes: u64,

    /// Publish once immediately on startup
    pub perform_initial_update: bool,
}

/// Owns the background publishing task
pub struct ScheduledTaskManager {
    config: ScheduledTaskConfig,
    publisher: RegistrationReportPublisher,
    task_handles: Vec<JoinHandle<()>>,
}

impl ScheduledTaskManager {
    pub fn new(config: ScheduledTaskConfig, publisher: RegistrationReportPublisher) -> Self {
        Self {
            config,
            publisher,
            task_handles: Vec::new(),
        }
    }

    /// Start all scheduled tasks
    pub fn start_all(&mut self) {
        if self.config.interval_minutes == 0 {
            tracing::info!("Scheduled publishing disabled, waiting for triggers only");
            return;
        }
        if Self::calculate_next_run_time(Utc::now(), self.config.interval_minutes).is_none() {
            tracing::error!(
                "Schedule interval of {} minutes is out of range, scheduled publishing disabled",
                self.config.interval_minutes
            );
            return;
        }

        let publisher = self.publisher.clone();
        let interval_minutes = self.config.interval_minutes;
        let perform_initial = self.config.perform_initial_update;

        tracing::info!(
            "Scheduling report publishing (interval: {} minutes, initial: {})",
            interval_minutes,
            perform_initial
        );

        let handle = tokio::spawn(async move {
            if perform_initial {
                tracing::info!("Performing initial report publish...");
                Self::run_report(&publisher).await;
            }
            Self::report_loop(publisher, interval_minutes).await;
        });
        self.task_handles.push(handle);
    }

    async fn report_loop(publisher: RegistrationReportPublisher, interval_minutes: u64) {
        loop {
            let now = Utc::now();
            let Some(next_trigger) = Self::calculate_next_run_time(now, interval_minutes) else {
                tracing::error!("No next publish slot after {}, stopping schedule", now);
                return;
            };
            let sleep_duration = (next_trigger - now)
                .to_std()
                .unwrap_or(Duration::from_secs(60));

            tracing::info!(
                "Next report publish at: {} (in {:.1} min)",
                next_trigger.format("%Y-%m-%d %H:%M:%S UTC"),
                sleep_duration.as_secs_f64() / 60.0
            );

            tokio::time::sleep(sleep_duration).await;
            Self::run_report(&publisher).await;
        }
    }

    async fn run_report(publisher: &RegistrationReportPublisher) {
        match publisher.run_scheduled().await {
            Ok(summary) => tracing::info!(
                "Scheduled publish done: {} entrants, {} messages edited",
                summary.entrant_count,
                summary.publish.edited
            ),
            Err(e) => tracing::error!("Scheduled publish failed: {:#}", e),
        }
    }

    /// Next slot strictly after `now` on the interval grid anchored at the Unix epoch.
    /// `None` when the interval or the slot does not fit in a timestamp.
    fn calculate_next_run_time(now: DateTime<Utc>, interval_minutes: u64) -> Option<DateTime<Utc>> {
        let step = i64::try_from(interval_minutes.max(1))
            .ok()
            .and_then(TimeDelta::try_minutes)?
            .num_seconds();

        let slots = now.timestamp().div_euclid(step).checked_add(1)?;
        DateTime::from_timestamp(slots.checked_mul(step)?, 0)
    }

    /// Stop all tasks
    pub async fn shutdown(self) {
        tracing::info!("Shutting down scheduled task manager...");

        for handle in self.task_handles {
            handle.abort();
        }

        tracing::info!("All scheduled tasks stopped");
    }
}
