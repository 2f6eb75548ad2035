//! Server configuration loaded from the environment.
//!
//! A `.env` file is honored via `dotenvy` in `main`. Only `GEMINI_API_KEY` is
//! required; everything else has a default.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::prompt::PromptPolicy;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Everything the server reads from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub prompt_policy: PromptPolicy,
    /// Deadline around the generation call; expiry maps to a generation error.
    pub generation_timeout: Duration,
    /// Append-only request audit log; disabled when unset.
    pub audit_log: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable not set")?;

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro".to_string());

        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().context("PORT is not a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let prompt_policy = match std::env::var("PROMPT_POLICY") {
            Ok(v) => PromptPolicy::from_str(&v)
                .with_context(|| format!("Unknown PROMPT_POLICY: {}", v))?,
            Err(_) => PromptPolicy::RefinedKeyword,
        };

        let generation_timeout = match std::env::var("GENERATION_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.parse()
                    .context("GENERATION_TIMEOUT_SECS is not a valid number of seconds")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        };

        let audit_log = std::env::var("AUDIT_LOG").ok().map(PathBuf::from);

        Ok(Self {
            gemini_api_key,
            gemini_model,
            port,
            upload_dir,
            prompt_policy,
            generation_timeout,
            audit_log,
        })
    }
}
