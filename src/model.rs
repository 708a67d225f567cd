use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Format of `created_at` in the tasks file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the timestamp a fresh task id is derived from.
pub const ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// A single task, saved as an object in the tasks file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub status: Status,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// The lifecycle states of a task. The serialized labels are the ones
/// found in existing tasks files and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Aborted")]
    Aborted,
}

impl Status {
    /// Every status, in lifecycle order.
    pub const ALL: [Status; 4] = [
        Status::ToDo,
        Status::InProgress,
        Status::Completed,
        Status::Aborted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::ToDo => "To Do",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Aborted => "Aborted",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::ToDo
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase and drop separators, so that "In Progress", "in-progress"
/// and "InProgress" all compare equal.
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Status {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(value);
        Status::ALL
            .iter()
            .copied()
            .find(|status| normalize(status.label()) == wanted)
            .ok_or_else(|| {
                TaskError::Validation(format!(
                    "unknown status '{}', expected one of: {}",
                    value,
                    Status::ALL
                        .iter()
                        .map(|s| s.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Which tasks a listing should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl FromStr for StatusFilter {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if normalize(value) == "all" {
            Ok(StatusFilter::All)
        } else {
            value.parse().map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Replacement values for the mutable fields of a task. `None` keeps
/// the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub status: Option<Status>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.status.is_none()
    }

    /// Overwrite the fields this update carries. `id` and `created_at`
    /// are never touched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(url) = &self.url {
            task.url = url.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
