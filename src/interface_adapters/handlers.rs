use crate::domain::ExtractionError;
use crate::interface_adapters::context::RequestContext;
use crate::interface_adapters::http::{json_response, timestamp_now};
use crate::interface_adapters::protocol::{
    ApiError, ErrorEnvelope, GetHostFlagsRequest, HostFlagsResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::ExtractHostFlagsUseCase;
use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;
use std::sync::Arc;

// Handler for extracting the encrypted host flags of a video's embed page.
#[tracing::instrument(
    name = "get_encrypted_host_flags",
    skip_all,
    fields(request_id = %ctx.request_id)
)]
pub async fn get_encrypted_host_flags(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Response {
    let request = GetHostFlagsRequest::from_body(&ctx.body);
    let use_case = ExtractHostFlagsUseCase {
        source: state.embed.clone(),
    };

    match use_case.execute(request.into()).await {
        Ok(extracted) => {
            let processing_time_ms = ctx.elapsed_ms();
            let fetch_duration_ms = extracted.fetch_duration.as_secs_f64() * 1000.0;
            tracing::info!(
                video_id = %extracted.video_id,
                fetch_duration = %format!("{fetch_duration_ms:.2}ms"),
                processing_time_ms,
                "encrypted host flags fetched successfully"
            );

            json_response(
                StatusCode::OK,
                &ctx.request_id,
                HostFlagsResponse {
                    encrypted_host_flags: extracted.encrypted_host_flags,
                    success: true,
                    timestamp: timestamp_now(),
                    processing_time_ms,
                },
            )
        }
        Err(err) => {
            if let ExtractionError::Upstream(message) = &err {
                tracing::error!(error = %message, "get encrypted host flags handler failed");
            }

            let (status, error) = map_extraction_error(err, &ctx.request_id);
            json_response(
                status,
                &ctx.request_id,
                ErrorEnvelope::new(error, timestamp_now()),
            )
        }
    }
}

// Maps extraction failures to their HTTP status and API error body.
pub fn map_extraction_error(err: ExtractionError, request_id: &str) -> (StatusCode, ApiError) {
    let code = err.code();
    match err {
        ExtractionError::MissingVideoId { received } => (
            StatusCode::BAD_REQUEST,
            ApiError::new(
                "video_id is required",
                code,
                json!({ "received": received }),
                request_id,
            ),
        ),
        ExtractionError::FlagsNotFound { video_id } => (
            StatusCode::NOT_FOUND,
            ApiError::new(
                "encryptedHostFlags not found",
                code,
                json!({ "videoId": video_id }),
                request_id,
            ),
        ),
        ExtractionError::Upstream(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(
                "Failed to fetch encrypted host flags",
                code,
                json!({ "originalError": message }),
                request_id,
            ),
        ),
    }
}
