use crate::domain::EmbedPageSource;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub enum EmbedPageError {
    Transport(reqwest::Error),
    Upstream { status: StatusCode },
    Body(reqwest::Error),
}

impl fmt::Display for EmbedPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedPageError::Transport(err) => write!(f, "{}", error_chain(err)),
            EmbedPageError::Upstream { status } => {
                write!(f, "Failed to fetch embed page: {}", status.as_u16())
            }
            EmbedPageError::Body(err) => {
                write!(f, "failed to read embed page body: {}", error_chain(err))
            }
        }
    }
}

impl Error for EmbedPageError {}

// reqwest keeps the actual cause (timeout, refused connection) in `source()`.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// Thin reqwest client for the public embed page.
#[derive(Clone)]
pub struct EmbedPageClient {
    http: Client,
    base_url: Url,
    user_agent: String,
}

impl EmbedPageClient {
    pub fn new(
        base_url: Url,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            user_agent: user_agent.into(),
        })
    }

    // The id is pushed as one percent-encoded path segment so it can't
    // change the upstream path or add a query.
    pub fn embed_url(&self, video_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(video_id);
        }
        url
    }
}

#[async_trait]
impl EmbedPageSource for EmbedPageClient {
    async fn fetch_embed_page(
        &self,
        video_id: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let res = self
            .http
            .get(self.embed_url(video_id))
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(EmbedPageError::Transport)?;
        let status = res.status();

        // Non-2xx pages are never scanned for flags.
        if !status.is_success() {
            return Err(Box::new(EmbedPageError::Upstream { status }));
        }

        Ok(res.text().await.map_err(EmbedPageError::Body)?)
    }
}
