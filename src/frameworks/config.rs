use std::{env, time::Duration};
use url::Url;

// Runtime/server settings read from the environment.

pub const DEFAULT_EMBED_BASE_URL: &str = "https://www.youtube.com/embed";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_EMBED_FETCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub embed_base_url: String,
    pub user_agent: String,
    pub embed_fetch_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            embed_base_url: DEFAULT_EMBED_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            embed_fetch_timeout: Duration::from_millis(DEFAULT_EMBED_FETCH_TIMEOUT_MS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, url::ParseError> {
        Ok(Self {
            embed_base_url: embed_base_url()?,
            user_agent: user_agent(),
            embed_fetch_timeout: embed_fetch_timeout(),
        })
    }
}

pub fn http_port() -> u16 {
    env::var("HOST_FLAGS_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3004)
}

pub fn bind_all_interfaces() -> bool {
    matches!(env::var("HOST_FLAGS_BIND_ALL").as_deref(), Ok("true" | "1"))
}

pub fn embed_base_url() -> Result<String, url::ParseError> {
    let raw = env::var("EMBED_BASE_URL").unwrap_or_else(|_| DEFAULT_EMBED_BASE_URL.to_string());
    parse_base_url(&raw)
}

pub fn user_agent() -> String {
    env::var("EMBED_USER_AGENT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
}

pub fn embed_fetch_timeout() -> Duration {
    let millis = env::var("EMBED_FETCH_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_EMBED_FETCH_TIMEOUT_MS);
    Duration::from_millis(millis)
}

// Rejects malformed base URLs at startup, including ones like `mailto:` that
// cannot take the video id as a path segment.
pub fn parse_base_url(raw: &str) -> Result<String, url::ParseError> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
