use crate::domain::ErrorCode;
use crate::use_cases::HostFlagsQuery;
use serde::Serialize;
use serde_json::Value;

// Request payload for host flag extraction: `{ "video_id": string }`.
// Parsed leniently from raw JSON so a missing or mistyped field still
// produces the JSON error envelope instead of a framework rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetHostFlagsRequest {
    pub video_id: Option<String>,
    pub received: Vec<String>,
}

impl GetHostFlagsRequest {
    pub fn from_body(body: &Value) -> Self {
        let Some(fields) = body.as_object() else {
            return Self::default();
        };

        Self {
            video_id: fields
                .get("video_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            received: fields.keys().cloned().collect(),
        }
    }
}

impl From<GetHostFlagsRequest> for HostFlagsQuery {
    fn from(request: GetHostFlagsRequest) -> Self {
        HostFlagsQuery {
            video_id: request.video_id,
            received: request.received,
        }
    }
}

// Success payload.
#[derive(Debug, Serialize)]
pub struct HostFlagsResponse {
    pub encrypted_host_flags: String,
    pub success: bool,
    pub timestamp: String,
    pub processing_time_ms: u64,
}

// Structured error carried inside every failure envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub code: ErrorCode,
    pub details: Value,
    #[serde(rename = "requestId")]
    pub request_id: String,
}

impl ApiError {
    pub fn new(
        message: impl Into<String>,
        code: ErrorCode,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code,
            details,
            request_id: request_id.into(),
        }
    }
}

// Failure payload: `{ success: false, error, timestamp }`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ApiError,
    pub timestamp: String,
}

impl ErrorEnvelope {
    pub fn new(error: ApiError, timestamp: String) -> Self {
        Self {
            success: false,
            error,
            timestamp,
        }
    }
}
