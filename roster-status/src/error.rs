use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid secret")]
    InvalidSecret,

    #[error("Missing {0}")]
    MissingConfig(&'static str),

    /// Line numbers are 1-based, as shown in a spreadsheet
    #[error("Malformed date {value:?} on line {line}")]
    MalformedDate { line: usize, value: String },

    #[error("Unreadable roster export: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub fn status(&self) -> StatusCode {
        match self {
            ReportError::InvalidSecret => StatusCode::BAD_REQUEST,
            ReportError::MissingConfig(_)
            | ReportError::MalformedDate { .. }
            | ReportError::Export(_)
            | ReportError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ReportError::Transport(e) => {
                tracing::error!("Report publishing failed: {:#}", e);
                "Report publishing failed".to_string()
            }
            other => {
                tracing::warn!("Rejected report trigger: {}", other);
                other.to_string()
            }
        };
        (status, body).into_response()
    }
}
