use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};

// Matches `"encryptedHostFlags":"<token>"` inside the embed page config.
static HOST_FLAGS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""encryptedHostFlags"\s*:\s*"([^"]+)""#).expect("valid host flags pattern")
});

// Stable machine-readable error codes returned to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingRequiredParams,
    FlagsNotFound,
    FetchError,
}

// Failure outcomes of a single extraction, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    MissingVideoId { received: Vec<String> },
    FlagsNotFound { video_id: String },
    Upstream(String),
}

impl ExtractionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractionError::MissingVideoId { .. } => ErrorCode::MissingRequiredParams,
            ExtractionError::FlagsNotFound { .. } => ErrorCode::FlagsNotFound,
            ExtractionError::Upstream(_) => ErrorCode::FetchError,
        }
    }
}

// Port for loading the embed page HTML for a video.
// The use case depends on this trait, not on the reqwest client.
#[async_trait]
pub trait EmbedPageSource: Send + Sync {
    async fn fetch_embed_page(
        &self,
        video_id: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

// Lets shared state hand an `Arc<dyn EmbedPageSource>` straight to use cases.
#[async_trait]
impl<T> EmbedPageSource for Arc<T>
where
    T: EmbedPageSource + ?Sized,
{
    async fn fetch_embed_page(
        &self,
        video_id: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        (**self).fetch_embed_page(video_id).await
    }
}

/// Returns the first `encryptedHostFlags` value found in `html`, if any.
pub fn find_encrypted_host_flags(html: &str) -> Option<&str> {
    HOST_FLAGS_PATTERN
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|token| token.as_str())
        .filter(|token| !token.is_empty())
}
