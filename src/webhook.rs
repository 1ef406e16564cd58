//! GitHub webhook payload shapes consumed by the relay
//!
//! Only the fields the relay reads are modelled. Every field is optional or
//! defaulted so a payload missing them still parses. Commits are read one by
//! one: a malformed commit never hides the ones around it.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// `pull_request` event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
}

/// `push` event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushEvent {
    #[serde(default, deserialize_with = "commits_lenient")]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commit {
    #[serde(default, deserialize_with = "text_lenient")]
    pub message: Option<String>,
}

/// `null` is an empty list; an entry that is not a commit object becomes a
/// commit without a message.
fn commits_lenient<'de, D>(deserializer: D) -> Result<Vec<Commit>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).unwrap_or_else(|e| {
                warn!(index, "Unexpected commit shape: {}", e);
                Commit::default()
            })
        })
        .collect())
}

/// Any non-string value reads as absent text.
fn text_lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// `pull_request_review` event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestReviewEvent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub body: Option<String>,
}

impl PullRequestEvent {
    pub fn body(&self) -> Option<&str> {
        self.pull_request.as_ref().and_then(|pr| pr.body.as_deref())
    }

    pub fn is_merged(&self) -> bool {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.merged)
            .unwrap_or(false)
    }
}

impl PullRequestReviewEvent {
    pub fn body(&self) -> Option<&str> {
        self.review.as_ref().and_then(|r| r.body.as_deref())
    }
}
