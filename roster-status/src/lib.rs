//! Publishes a registration status board, built from a tab-separated roster
//! export, into a fixed set of pre-created chat messages.

pub mod config;
pub mod error;
pub mod logging;
pub mod module;
pub mod service;

pub use error::ReportError;
pub use module::pipeline::{RegistrationReportPublisher, ReportSummary};
