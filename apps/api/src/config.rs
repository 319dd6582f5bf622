use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::source::random_user::DEFAULT_RANDOM_USER_URL;
use crate::source::SourceBackend;
use crate::workflow::clamp_count;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub resume_source: SourceBackend,
    pub random_user_url: String,
    pub http_timeout_secs: u64,
    /// Directory exported PDFs are written to.
    pub output_dir: PathBuf,
    /// Count used until a client stores its own (clamped to 1..=15).
    pub default_resume_count: u32,
    pub notification_history: usize,
    /// Fixes the synthetic generator's output when set.
    pub synthetic_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let default_count: i64 = parse_var("DEFAULT_RESUME_COUNT", &get("DEFAULT_RESUME_COUNT", "1"))?;

        Ok(Config {
            port: parse_var("PORT", &get("PORT", "8080"))?,
            rust_log: get("RUST_LOG", "info"),
            resume_source: get("RESUME_SOURCE", "randomuser")
                .parse()
                .map_err(|e: String| anyhow!(e))
                .context("RESUME_SOURCE must be 'randomuser' or 'synthetic'")?,
            random_user_url: get("RANDOM_USER_URL", DEFAULT_RANDOM_USER_URL),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", &get("HTTP_TIMEOUT_SECS", "30"))?,
            output_dir: PathBuf::from(get("OUTPUT_DIR", "./exports")),
            default_resume_count: clamp_count(default_count),
            notification_history: parse_var(
                "NOTIFICATION_HISTORY",
                &get("NOTIFICATION_HISTORY", "50"),
            )?,
            synthetic_seed: lookup("SYNTHETIC_SEED")
                .map(|v| parse_var("SYNTHETIC_SEED", &v))
                .transpose()?,
        })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: '{value}'"))
}
