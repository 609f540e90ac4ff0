use roster_status::config::ServiceConfig;
use roster_status::module::scheduled::{ScheduledTaskConfig, ScheduledTaskManager};
use roster_status::service;
use roster_status::RegistrationReportPublisher;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServiceConfig::load()?;

    // Initialize logging
    let _logging_guard = roster_status::logging::init_logging(
        &config.log_dir,
        "roster-status",
        &config.log_level,
    )?;

    tracing::info!("Roster status publisher starting...");

    let publisher = RegistrationReportPublisher::from_env()?;

    let task_config = ScheduledTaskConfig {
        interval_minutes: config.schedule_interval_minutes,
        perform_initial_update: config.publish_on_startup,
    };
    let mut task_manager = ScheduledTaskManager::new(task_config, publisher.clone());
    task_manager.start_all();

    let app = service::router(publisher);
    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    tracing::info!("Trigger endpoint listening on http://{}", config.server_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received.");
        })
        .await?;

    task_manager.shutdown().await;
    Ok(())
}
