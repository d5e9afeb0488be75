// Shared HTTP response helpers so every reply carries the same JSON envelope headers.

use crate::interface_adapters::context::REQUEST_ID_HEADER;
use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

// JSON response tagged with the request id.
pub fn json_response<T: Serialize>(status: StatusCode, request_id: &str, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
