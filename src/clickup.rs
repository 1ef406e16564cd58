//! Client for the two ClickUp task mutations the relay performs

use serde::Serialize;
use serde_json::Value;
use std::error::Error as _;
use tracing::{error, info};

use crate::error::ClickUpError;
use crate::task_ref::TaskId;

pub const DEFAULT_API_URL: &str = "https://api.clickup.com/api/v2";

/// Workflow states the relay moves tasks into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    Merged,
    Closed,
    #[serde(rename = "In Progress")]
    InProgress,
    Review,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Merged => "Merged",
            TaskStatus::Closed => "Closed",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings needed to talk to ClickUp
#[derive(Debug, Clone)]
pub struct ClickUpConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: TaskStatus,
}

#[derive(Serialize)]
struct NewComment<'a> {
    comment_text: &'a str,
}

#[derive(Clone)]
pub struct ClickUpClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ClickUpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickUpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ClickUpClient {
    pub fn new(config: ClickUpConfig) -> Result<Self, ClickUpError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("github_clickup_relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// PUT /task/{id} with the new status
    pub async fn update_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<Value, ClickUpError> {
        let url = format!("{}/task/{}", self.base_url, task_id);
        let request = self.http.put(url).json(&StatusUpdate { status });
        let data = self.send(request).await?;
        info!(task_id = %task_id, status = %status, response = %data, "Task status updated");
        Ok(data)
    }

    /// POST /task/{id}/comment
    pub async fn add_task_comment(
        &self,
        task_id: &TaskId,
        comment_text: &str,
    ) -> Result<Value, ClickUpError> {
        let url = format!("{}/task/{}/comment", self.base_url, task_id);
        let request = self.http.post(url).json(&NewComment { comment_text });
        let data = self.send(request).await?;
        info!(task_id = %task_id, response = %data, "Comment added");
        Ok(data)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ClickUpError> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        // ClickUp answers with JSON, but an empty or non-JSON body must not hide the status
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(ClickUpError::Api {
                status,
                body: (!body.is_null()).then_some(body),
            })
        }
    }
}

/// Logs a failed ClickUp call: message, any response body, and the error's source chain.
pub fn log_api_failure(operation: &str, task_id: &TaskId, err: &ClickUpError) {
    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }

    error!(
        task_id = %task_id,
        response = ?err.response_body(),
        sources = ?chain,
        "Error {} ClickUp task: {}",
        operation,
        err
    );
}
