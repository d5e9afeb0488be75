use crate::interface_adapters::handlers::get_encrypted_host_flags;
use crate::interface_adapters::state::AppState;
use axum::{Router, routing::post};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/encrypted-host-flags", post(get_encrypted_host_flags))
        .with_state(state)
}
