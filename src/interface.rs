use std::time::Duration as STDDuration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use humantime::format_duration;
use prettytable::Table;

use crate::error::TaskError;
use crate::model::{StatusFilter, Task, TaskUpdate, TIMESTAMP_FORMAT};
use crate::store::{self, TaskStore};

const DESCRIPTION_WIDTH: usize = 40;

/// How a task's fields are printed in tables.
pub trait TaskLabels {
    fn fmt_description(&self) -> String;
    fn fmt_created_at(&self) -> String;
    fn fmt_age(&self, now: NaiveDateTime) -> String;
}

impl TaskLabels for Task {
    fn fmt_description(&self) -> String {
        textwrap::fill(&self.description, DESCRIPTION_WIDTH)
    }

    fn fmt_created_at(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Time since creation, to the minute.
    fn fmt_age(&self, now: NaiveDateTime) -> String {
        let secs = (now - self.created_at).num_seconds();
        if secs < 60 {
            return "just now".to_string();
        }
        let minutes = secs as u64 / 60;
        format!("{} ago", format_duration(STDDuration::from_secs(minutes * 60)))
    }
}

fn load(store: &TaskStore) -> Result<Vec<Task>> {
    store
        .load()
        .with_context(|| format!("Failed to load tasks from {}.", store.path().display()))
}

fn save(store: &TaskStore, tasks: &[Task]) -> Result<()> {
    store
        .save(tasks)
        .with_context(|| format!("Failed to save tasks to {}.", store.path().display()))
}

fn print_task(task: &Task) {
    let mut table = Table::new();
    table.add_row(row!["id", task.id]);
    table.add_row(row!["title", task.title]);
    table.add_row(row!["description", task.fmt_description()]);
    table.add_row(row!["url", task.url]);
    table.add_row(row!["status", task.status]);
    table.add_row(row!["created at", task.fmt_created_at()]);
    table.printstd();
}

pub fn add_task(store: &TaskStore, title: String, description: String, url: String) -> Result<()> {
    let tasks = load(store)?;
    let (tasks, task) = store::create(&tasks, &title, &description, &url)?;
    save(store, &tasks)?;
    println!("Added task {}.", task.id);
    print_task(&task);
    Ok(())
}

pub fn list(store: &TaskStore, filter: StatusFilter) -> Result<()> {
    let tasks = load(store)?;
    let shown = store::filter_by_status(&tasks, filter);
    if shown.is_empty() {
        match filter {
            StatusFilter::All => println!("No tasks. Use 'taskjar add' to create one."),
            StatusFilter::Only(status) => println!("No tasks with status '{}'.", status),
        }
        return Ok(());
    }

    let now = Local::now().naive_local();
    let mut table = Table::new();
    table.add_row(row!["id", "title", "description", "url", "status", "age"]);
    for task in &shown {
        table.add_row(row![
            task.id,
            task.title,
            task.fmt_description(),
            task.url,
            task.status,
            task.fmt_age(now)
        ]);
    }
    table.printstd();

    if let StatusFilter::Only(_) = filter {
        println!("{} of {} tasks ({}).", shown.len(), tasks.len(), filter);
    }
    Ok(())
}

pub fn show(store: &TaskStore, id: String) -> Result<()> {
    let tasks = load(store)?;
    let task = store::find(&tasks, &id).ok_or(TaskError::NotFound { id })?;
    print_task(task);
    Ok(())
}

pub fn edit(store: &TaskStore, id: String, fields: TaskUpdate) -> Result<()> {
    let tasks = load(store)?;
    if store::find(&tasks, &id).is_none() {
        return Err(TaskError::NotFound { id }.into());
    }
    if fields.is_empty() {
        println!("Nothing to change. Pass --title, --description, --url or --status.");
        return Ok(());
    }
    let tasks = store::update(&tasks, &id, &fields)?;
    save(store, &tasks)?;
    if let Some(task) = store::find(&tasks, &id) {
        println!("Updated task {}.", task.id);
        print_task(task);
    }
    Ok(())
}

pub fn remove_task(store: &TaskStore, id: String) -> Result<()> {
    let tasks = load(store)?;
    let remaining = store::delete(&tasks, &id);
    if remaining.len() == tasks.len() {
        println!("No task with id '{}', nothing removed.", id);
        return Ok(());
    }
    save(store, &remaining)?;
    println!("Removed task {}.", id);
    Ok(())
}

pub fn clear(store: &TaskStore) -> Result<()> {
    let tasks = load(store)?;
    if tasks.is_empty() {
        println!("No tasks to clear.");
        return Ok(());
    }
    save(store, &store::clear(&tasks))?;
    println!("Removed {} tasks.", tasks.len());
    Ok(())
}

pub fn stats(store: &TaskStore) -> Result<()> {
    let tasks = load(store)?;
    let mut table = Table::new();
    table.add_row(row!["status", "tasks"]);
    for (status, count) in store::counts_by_status(&tasks) {
        table.add_row(row![status, r->count]);
    }
    table.add_row(row!["total", r->tasks.len()]);
    table.printstd();
    Ok(())
}
