use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::Value;
use std::convert::Infallible;
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Per-request data handed to handlers: correlation id, start time and decoded body.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub started_at: Instant,
    pub body: Value,
}

impl RequestContext {
    // Whole milliseconds since the request started.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

// Never rejects: a missing id is generated and an unreadable body decodes to null,
// so the handler can always answer with its own JSON envelope.
impl<S> FromRequest<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let started_at = Instant::now();

        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let body = match Bytes::from_request(req, state).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            Err(err) => {
                tracing::debug!(request_id = %request_id, error = %err, "failed to read request body");
                Value::Null
            }
        };

        Ok(Self {
            request_id,
            started_at,
            body,
        })
    }
}
