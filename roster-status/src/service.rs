use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::ReportError;
use crate::module::pipeline::RegistrationReportPublisher;

const SECRET_PARAM: &str = "secret";

/// First `secret` in the query string; later repeats are ignored
fn first_secret(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == SECRET_PARAM)
        .map(|(_, value)| value.as_str())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Publish the report on demand. Answers with the sheet date and entrant count.
async fn trigger_report(
    State(publisher): State<RegistrationReportPublisher>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<String, ReportError> {
    tracing::info!("Report trigger received");
    let summary = publisher.handle_trigger(first_secret(&params)).await?;
    Ok(summary.diagnostic_body())
}

pub fn router(publisher: RegistrationReportPublisher) -> Router {
    Router::new()
        .route("/", get(trigger_report).post(trigger_report))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(publisher)
}
