//! Webhook handler for GitHub pull request, push and review events

use axum::{
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, info, warn};

use crate::SharedState;
use crate::relay::{WebhookOutcome, dispatch};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
const HEADER_DELIVERY: &str = "x-github-delivery";

/// Handles the GitHub webhook POST request.
///
/// GitHub always gets a 200; failures talking to ClickUp only reach the log.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let event = headers.get(HEADER_EVENT).and_then(|v| v.to_str().ok());
    let delivery = headers
        .get(HEADER_DELIVERY)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info!(event = ?event, delivery, "Received webhook");

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(delivery, "Could not parse JSON body: {}", e);
            return (StatusCode::OK, WebhookOutcome::Received.message());
        }
    };
    debug!("{:#?}", &payload);

    let outcome = dispatch(&state.clickup, event, payload).await;
    (StatusCode::OK, outcome.message())
}
