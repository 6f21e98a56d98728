use anyhow::{ensure, Context, Result};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// The API key is the only secret. It is optional at startup: without it the
/// server still boots, reports the problem, and every model call fails with
/// `LlmError::MissingApiKey`.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub site_url: String,
    pub site_name: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are dropped.
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_idle_secs = get("SESSION_IDLE_SECS")
            .unwrap_or_else(|| "3600".to_string())
            .parse::<u64>()
            .context("SESSION_IDLE_SECS must be a whole number of seconds")?;
        ensure!(session_idle_secs > 0, "SESSION_IDLE_SECS must be greater than zero");

        Ok(Config {
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_base_url: get("OPENROUTER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            site_url: get("SITE_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            site_name: get("SITE_NAME").unwrap_or_else(|| "Interview Simulator".to_string()),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm_timeout_secs: get("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: match get("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            session_idle_secs,
        })
    }

    pub fn llm_enabled(&self) -> bool {
        self.openrouter_api_key.is_some()
    }
}
