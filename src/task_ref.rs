//! Locating ClickUp task references in free text

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static TASK_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://app\.clickup\.com/t/([a-zA-Z0-9]+)").expect("task URL pattern is valid")
});

/// Identifier of a ClickUp task, as found in a task URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskId(String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the id of the first `https://app.clickup.com/t/<id>` link in `text`.
/// Absent text is treated the same as text without a link.
pub fn extract_task_id(text: Option<&str>) -> Option<TaskId> {
    let caps = TASK_URL.captures(text?)?;
    caps.get(1).map(|m| TaskId(m.as_str().to_string()))
}
