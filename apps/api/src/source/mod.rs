//! Resume sources — where synthetic resume records come from.
//!
//! `AppState` never sees a concrete backend: the workflow holds an
//! `Arc<dyn ResumeSource>` chosen at startup from `RESUME_SOURCE`.

pub mod random_user;
pub mod synthetic;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::ResumeRecord;

pub use random_user::RandomUserSource;
pub use synthetic::SyntheticSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("random user API returned no results")]
    EmptyResults,
}

/// Produces one randomized resume per call. Calls are not idempotent.
#[async_trait]
pub trait ResumeSource: Send + Sync {
    async fn fetch_one(&self) -> Result<ResumeRecord, SourceError>;

    /// Short backend label for logs ("randomuser" | "synthetic").
    fn backend_name(&self) -> &'static str;
}

/// Which `ResumeSource` implementation to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceBackend {
    RandomUser,
    Synthetic,
}

impl std::str::FromStr for SourceBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "randomuser" | "random_user" | "random-user" => Ok(SourceBackend::RandomUser),
            "synthetic" | "offline" => Ok(SourceBackend::Synthetic),
            other => Err(format!("unknown resume source '{other}'")),
        }
    }
}
