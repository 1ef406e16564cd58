//! Liveness and server status endpoints

use axum::{Json, extract::State as AxumState, response::IntoResponse};
use serde_json::json;

use crate::SharedState;

/// Root health check endpoint
pub async fn root() -> &'static str {
    "github_clickup_relay - healthy"
}

/// Returns server information and the ClickUp API the relay talks to
pub async fn status(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    Json(json!({
        "server": {
            "name": "github_clickup_relay",
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at,
            "uptime_seconds": state.start_time.elapsed().as_secs(),
        },
        "clickup": {
            "api_url": state.clickup.base_url(),
        },
        "status": "healthy"
    }))
}
