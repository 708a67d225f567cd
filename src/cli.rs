use std::path::PathBuf;
use structopt::StructOpt;

use crate::model::{Status, StatusFilter};

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Create a new task.
    Add {
        /// The task title.
        #[structopt()]
        title: String,

        /// Longer notes about the task.
        #[structopt(short, long, default_value = "")]
        description: String,

        /// A related link.
        #[structopt(short, long, default_value = "")]
        url: String,
    },
    /// List tasks, optionally only those with a given status.
    List {
        /// "All", "To Do", "In Progress", "Completed" or "Aborted".
        #[structopt(short, long, default_value = "All")]
        status: StatusFilter,
    },
    /// Show a single task.
    Show {
        #[structopt()]
        id: String,
    },
    /// Change the title, description, url or status of a task.
    Edit {
        #[structopt()]
        id: String,

        #[structopt(long)]
        title: Option<String>,

        #[structopt(short, long)]
        description: Option<String>,

        #[structopt(short, long)]
        url: Option<String>,

        /// "To Do", "In Progress", "Completed" or "Aborted".
        #[structopt(short, long)]
        status: Option<Status>,
    },
    /// Remove a task by id.
    Rm {
        #[structopt()]
        id: String,
    },
    /// Remove every task.
    Clear,
    /// Count tasks per status.
    Stats,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "taskjar",
    about = "A small task tracker backed by a JSON file."
)]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Command,

    /// Use a different tasks file.
    #[structopt(parse(from_os_str), short = "f", long, env = "TASKJAR_FILE")]
    pub tasks_file: Option<PathBuf>,

    /// Log what the store is doing to stderr.
    #[structopt(short, long)]
    pub verbose: bool,
}
