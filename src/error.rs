use std::path::PathBuf;

/// Errors raised by the task store.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Bad input to create or update: empty title, unknown status.
    #[error("invalid input: {0}")]
    Validation(String),

    /// No task carries the requested id.
    #[error("no task with id '{id}'")]
    NotFound { id: String },

    /// The tasks file could not be read, parsed or written.
    #[error("tasks file {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl TaskError {
    pub fn persistence<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        TaskError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether the user can fix this by retrying with other input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TaskError::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn persistence_message_names_the_file() {
        let err = TaskError::persistence(
            "/tmp/tasks.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "tasks file /tmp/tasks.json: denied");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn input_errors_are_recoverable() {
        assert!(TaskError::Validation("title is empty".into()).is_recoverable());
        let err = TaskError::NotFound { id: "42".into() };
        assert_eq!(err.to_string(), "no task with id '42'");
        assert!(err.is_recoverable());
    }
}
