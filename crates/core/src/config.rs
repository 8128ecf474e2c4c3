use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;

static DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
static ENV_API_URL: &str = "TASKDECK_API_URL";
static ENV_TIMEOUT: &str = "TASKDECK_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Construct [`ClientConfig`] by resolving the backend origin using the provided override,
    /// environment variables, and the local development default.
    pub fn discover(base_url_override: Option<String>) -> Result<Self> {
        let raw = resolve_base_url(base_url_override);
        let timeout = env::var(ENV_TIMEOUT)
            .ok()
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{ENV_TIMEOUT} must be a number of seconds"))
            })
            .transpose()?;
        Ok(Self::from_base_url(&raw)?.with_timeout(timeout))
    }

    /// Construct [`ClientConfig`] directly from a backend origin.
    pub fn from_base_url(raw: &str) -> Result<Self> {
        let base_url = parse_base_url(raw)?;
        Ok(Self {
            base_url,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn resolve_base_url(base_url_override: Option<String>) -> String {
    if let Some(url) = base_url_override {
        return url;
    }

    if let Ok(env_url) = env::var(ENV_API_URL) {
        if !env_url.trim().is_empty() {
            return env_url;
        }
    }

    DEFAULT_BASE_URL.to_string()
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .with_context(|| format!("Invalid backend URL '{}'", raw.trim()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "Unsupported scheme '{}' in backend URL: expected http|https",
            url.scheme()
        ));
    }
    Ok(url)
}
