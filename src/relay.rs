//! Event dispatch: turns GitHub events into ClickUp status updates and comments

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clickup::{ClickUpClient, TaskStatus, log_api_failure};
use crate::task_ref::{TaskId, extract_task_id};
use crate::webhook::{PullRequestEvent, PullRequestReviewEvent, PushEvent};

pub const EVENT_PULL_REQUEST: &str = "pull_request";
pub const EVENT_PUSH: &str = "push";
pub const EVENT_PULL_REQUEST_REVIEW: &str = "pull_request_review";

/// What the webhook sender is told. The HTTP status is always 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    NoTaskId,
    Received,
}

impl WebhookOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            WebhookOutcome::NoTaskId => "No Task ID found.",
            WebhookOutcome::Received => "Webhook received",
        }
    }
}

/// Result of relaying the commits of one push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub commits: usize,
    pub without_task: usize,
    pub commented: usize,
    pub failed: usize,
}

/// Status a pull request action moves its task into, if any
pub fn pull_request_status(action: Option<&str>, merged: bool) -> Option<TaskStatus> {
    match action {
        Some("closed") if merged => Some(TaskStatus::Merged),
        Some("closed") => Some(TaskStatus::Closed),
        Some("opened") => Some(TaskStatus::InProgress),
        _ => None,
    }
}

/// Status a review action moves its task into, if any
pub fn review_status(action: Option<&str>) -> Option<TaskStatus> {
    match action {
        Some("submitted") => Some(TaskStatus::Review),
        _ => None,
    }
}

pub fn commit_comment(message: &str) -> String {
    format!("New commit: {}", message)
}

/// Routes one delivery to the rule for its event type.
pub async fn dispatch(
    client: &ClickUpClient,
    event_type: Option<&str>,
    payload: Value,
) -> WebhookOutcome {
    match event_type {
        Some(EVENT_PULL_REQUEST) => match parse::<PullRequestEvent>(EVENT_PULL_REQUEST, payload) {
            Some(event) => relay_pull_request(client, &event).await,
            None => WebhookOutcome::Received,
        },
        Some(EVENT_PUSH) => {
            if let Some(event) = parse::<PushEvent>(EVENT_PUSH, payload) {
                let summary = relay_push(client, &event).await;
                info!(
                    commits = summary.commits,
                    without_task = summary.without_task,
                    commented = summary.commented,
                    failed = summary.failed,
                    "Push relayed"
                );
            }
            WebhookOutcome::Received
        }
        Some(EVENT_PULL_REQUEST_REVIEW) => {
            match parse::<PullRequestReviewEvent>(EVENT_PULL_REQUEST_REVIEW, payload) {
                Some(event) => relay_review(client, &event).await,
                None => WebhookOutcome::Received,
            }
        }
        other => {
            debug!("Ignoring {:?} event", other);
            WebhookOutcome::Received
        }
    }
}

fn parse<T: DeserializeOwned>(event: &str, payload: Value) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(event, "Unexpected payload shape: {}", e);
            None
        }
    }
}

pub async fn relay_pull_request(client: &ClickUpClient, event: &PullRequestEvent) -> WebhookOutcome {
    let Some(task_id) = extract_task_id(event.body()) else {
        info!("No ClickUp Task ID found in PR description.");
        return WebhookOutcome::NoTaskId;
    };

    if let Some(status) = pull_request_status(event.action.as_deref(), event.is_merged()) {
        set_status(client, &task_id, status).await;
    } else {
        debug!(task_id = %task_id, action = ?event.action, "No status change for pull request action");
    }

    WebhookOutcome::Received
}

/// Comments on the task of every commit that references one, in push order.
pub async fn relay_push(client: &ClickUpClient, event: &PushEvent) -> PushSummary {
    let mut summary = PushSummary {
        commits: event.commits.len(),
        ..Default::default()
    };

    for commit in &event.commits {
        let Some(task_id) = extract_task_id(commit.message.as_deref()) else {
            info!("No ClickUp Task ID found in commit message.");
            summary.without_task += 1;
            continue;
        };

        let message = commit.message.as_deref().unwrap_or_default();
        match client.add_task_comment(&task_id, &commit_comment(message)).await {
            Ok(_) => {
                info!(task_id = %task_id, "Commit details added to ClickUp task.");
                summary.commented += 1;
            }
            Err(e) => {
                log_api_failure("adding comment to", &task_id, &e);
                summary.failed += 1;
            }
        }
    }

    summary
}

pub async fn relay_review(client: &ClickUpClient, event: &PullRequestReviewEvent) -> WebhookOutcome {
    let Some(task_id) = extract_task_id(event.body()) else {
        info!("No ClickUp Task ID found in Review description.");
        return WebhookOutcome::NoTaskId;
    };

    if let Some(status) = review_status(event.action.as_deref()) {
        set_status(client, &task_id, status).await;
    }

    WebhookOutcome::Received
}

async fn set_status(client: &ClickUpClient, task_id: &TaskId, status: TaskStatus) {
    match client.update_task_status(task_id, status).await {
        Ok(_) => info!(task_id = %task_id, status = %status, "ClickUp task status updated."),
        Err(e) => log_api_failure("updating", task_id, &e),
    }
}
