//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.
//!
//! The risk engine itself never produces an `AppError`; only configuration loading,
//! provider fetches and the CLI shell do.

use crate::engine::ThresholdError;
use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Transport or HTTP status error from a provider request (`reqwest`).
    #[error("API Error: {0}")]
    Api(Arc<reqwest::Error>),

    /// A provider answered, but with a payload we cannot use.
    #[error("Provider Error: {0}")]
    Provider(String),

    /// A provider kept answering 429 after every retry.
    #[error("Rate limited by {0}, try again later")]
    RateLimited(String),

    /// Error during JSON parsing (`serde_json`).
    #[error("JSON Parsing Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Error while reading a FIRMS CSV payload (`csv`).
    #[error("CSV Parsing Error: {0}")]
    Csv(Arc<csv::Error>),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Invalid environment configuration or threshold tables.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error specific to CLI logic or argument handling.
    #[error("CLI Error: {0}")]
    Cli(String),

    /// The tracing subscriber could not be installed.
    #[error("Logging Error: {0}")]
    Logging(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Api(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(Arc::new(err))
    }
}

impl From<ThresholdError> for AppError {
    fn from(err: ThresholdError) -> Self {
        AppError::Config(err.to_string())
    }
}
