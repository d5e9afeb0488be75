use std::time::Duration;

use crate::domain::{EmbedPageSource, ExtractionError, find_encrypted_host_flags};
use crate::use_cases::timing::measure_async;

// Fallback used when an upstream error renders to an empty message.
const UNKNOWN_ERROR: &str = "Unknown error";

// Input for the extraction use case, already lifted out of the request body.
#[derive(Debug, Clone, Default)]
pub struct HostFlagsQuery {
    pub video_id: Option<String>,
    // Top-level keys present in the request body, echoed on validation errors.
    pub received: Vec<String>,
}

// Result returned by the extraction use case.
#[derive(Debug, Clone)]
pub struct ExtractedHostFlags {
    pub video_id: String,
    pub encrypted_host_flags: String,
    pub fetch_duration: Duration,
}

// Extraction use case with the upstream page source injected.
pub struct ExtractHostFlagsUseCase<S> {
    pub source: S,
}

impl<S> ExtractHostFlagsUseCase<S>
where
    S: EmbedPageSource,
{
    pub async fn execute(
        &self,
        query: HostFlagsQuery,
    ) -> Result<ExtractedHostFlags, ExtractionError> {
        let video_id = match query.video_id.filter(|id| !id.is_empty()) {
            Some(video_id) => video_id,
            None => {
                return Err(ExtractionError::MissingVideoId {
                    received: query.received,
                });
            }
        };

        tracing::info!(video_id = %video_id, "fetching encrypted host flags");

        let timed = measure_async(self.source.fetch_embed_page(&video_id)).await;
        let html = timed.result.map_err(|err| {
            let message = err.to_string();
            if message.is_empty() {
                ExtractionError::Upstream(UNKNOWN_ERROR.to_string())
            } else {
                ExtractionError::Upstream(message)
            }
        })?;

        let Some(token) = find_encrypted_host_flags(&html) else {
            tracing::warn!(video_id = %video_id, "encryptedHostFlags not found in embed page");
            return Err(ExtractionError::FlagsNotFound { video_id });
        };

        Ok(ExtractedHostFlags {
            encrypted_host_flags: token.to_string(),
            video_id,
            fetch_duration: timed.duration,
        })
    }
}
