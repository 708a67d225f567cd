use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::model::{Status, StatusFilter, Task, TaskUpdate, ID_FORMAT};

/// The tasks file. Every save rewrites the whole collection.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted collection. A missing file is an empty
    /// collection; a file that can't be parsed is an error, never empty.
    pub fn load(&self) -> Result<Vec<Task>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no tasks file yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(TaskError::persistence(&self.path, err)),
        };

        let tasks: Vec<Task> = serde_json::from_str(&content)
            .map_err(|err| TaskError::persistence(&self.path, err))?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Replace the file with `tasks`. The new content goes to a temporary
    /// file next to the target which is then renamed over it, so the old
    /// file survives any failure. An existing file keeps its permissions.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = to_pretty_json(tasks).map_err(|err| TaskError::persistence(&self.path, err))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| TaskError::persistence(&self.path, err))?;

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|err| TaskError::persistence(&self.path, err))?;
        match fs::metadata(&self.path) {
            Ok(existing) => tmp
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| TaskError::persistence(&self.path, err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(TaskError::persistence(&self.path, err)),
        }
        tmp.write_all(&content)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|err| TaskError::persistence(&self.path, err))?;
        tmp.persist(&self.path)
            .map_err(|err| TaskError::persistence(&self.path, err.error))?;

        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Pretty print with four space indentation, matching files written by
/// earlier versions.
fn to_pretty_json(tasks: &[Task]) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    tasks.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Return the current local time, with seconds precision.
fn clt_secs() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Derive an id from `now`, adding a `-N` suffix when tasks created in
/// the same second already hold it.
fn next_id(tasks: &[Task], now: NaiveDateTime) -> String {
    let base = now.format(ID_FORMAT).to_string();
    let taken = |candidate: &str| tasks.iter().any(|task| task.id == candidate);

    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken(&candidate) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    candidate
}

/// Append a new `To Do` task. The caller is responsible for saving.
pub fn create(tasks: &[Task], title: &str, description: &str, url: &str) -> Result<(Vec<Task>, Task)> {
    create_at(tasks, title, description, url, clt_secs())
}

fn create_at(
    tasks: &[Task],
    title: &str,
    description: &str,
    url: &str,
    now: NaiveDateTime,
) -> Result<(Vec<Task>, Task)> {
    if title.trim().is_empty() {
        return Err(TaskError::Validation("task title cannot be empty".to_string()));
    }

    let task = Task {
        id: next_id(tasks, now),
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        status: Status::default(),
        created_at: now,
    };
    info!(id = %task.id, "created task");

    let mut new_tasks = tasks.to_vec();
    new_tasks.push(task.clone());
    Ok((new_tasks, task))
}

/// Get the task with the given id, if any.
pub fn find<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

/// Overwrite the mutable fields of the task with the given id.
pub fn update(tasks: &[Task], id: &str, fields: &TaskUpdate) -> Result<Vec<Task>> {
    let position = tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| TaskError::NotFound { id: id.to_string() })?;

    let mut new_tasks = tasks.to_vec();
    fields.apply_to(&mut new_tasks[position]);
    info!(id, "updated task");
    Ok(new_tasks)
}

/// Remove the task with the given id. Unknown ids are ignored.
pub fn delete(tasks: &[Task], id: &str) -> Vec<Task> {
    let new_tasks: Vec<Task> = tasks.iter().filter(|task| task.id != id).cloned().collect();
    if new_tasks.len() < tasks.len() {
        info!(id, "deleted task");
    } else {
        debug!(id, "delete ignored, no such task");
    }
    new_tasks
}

pub fn clear(tasks: &[Task]) -> Vec<Task> {
    info!(count = tasks.len(), "cleared tasks");
    Vec::new()
}

/// Tasks matching `filter`, in their original order.
pub fn filter_by_status(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task.status))
        .cloned()
        .collect()
}

/// Number of tasks per status. Every status is present, even at zero.
pub fn counts_by_status(tasks: &[Task]) -> BTreeMap<Status, usize> {
    let mut counts: BTreeMap<Status, usize> = Status::ALL.iter().map(|status| (*status, 0)).collect();
    for task in tasks {
        *counts.entry(task.status).or_insert(0) += 1;
    }
    counts
}
