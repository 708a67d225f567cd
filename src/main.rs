#[macro_use] extern crate prettytable;

use anyhow::anyhow;
use directories::ProjectDirs;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod interface;
mod model;
mod store;

use crate::error::TaskError;
use crate::model::TaskUpdate;
use crate::store::TaskStore;
use cli::{Command::*, CommandLineArgs};

fn find_default_tasks_file() -> Option<PathBuf> {
    let base_dirs = ProjectDirs::from("", "", "taskjar")?;
    let mut path = PathBuf::from(base_dirs.data_dir());
    path.push("tasks.json");
    Some(path)
}

/// Logs go to stderr so they never mix with the tables on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "taskjar=debug" } else { "taskjar=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs {
        action,
        tasks_file,
        verbose,
    } = CommandLineArgs::from_args();

    init_tracing(verbose);

    // Unpack the tasks file.
    let tasks_file = tasks_file
        .or_else(find_default_tasks_file)
        .ok_or_else(|| anyhow!("Failed to find a home for the tasks file, use --tasks-file."))?;
    let store = TaskStore::new(tasks_file);

    // Perform the action.
    let outcome = match action {
        Add {
            title,
            description,
            url,
        } => interface::add_task(&store, title, description, url),
        List { status } => interface::list(&store, status),
        Show { id } => interface::show(&store, id),
        Edit {
            id,
            title,
            description,
            url,
            status,
        } => interface::edit(
            &store,
            id,
            TaskUpdate {
                title,
                description,
                url,
                status,
            },
        ),
        Rm { id } => interface::remove_task(&store, id),
        Clear => interface::clear(&store),
        Stats => interface::stats(&store),
    };

    // Bad input gets a one line message; anything else keeps the full chain.
    if let Err(err) = &outcome {
        if let Some(task_error) = err.downcast_ref::<TaskError>() {
            if task_error.is_recoverable() {
                eprintln!("{}", task_error);
                std::process::exit(2);
            }
        }
    }
    outcome
}
