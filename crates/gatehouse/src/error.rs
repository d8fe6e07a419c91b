use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while bootstrapping a task.
///
/// None of the messages carry a password.
#[derive(Error, Debug)]
pub enum GatehouseError {
    #[error("{0}")]
    Parameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot load preferences from {}: {message}", path.display())]
    Preferences { path: PathBuf, message: String },

    #[error("Unable to reach the service: {0}")]
    Connection(String),

    #[error("Login failed after {attempts} attempt(s)")]
    LoginFailed { attempts: u32 },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// What a [`crate::session::ServiceClient`] reports when `connect` fails.
///
/// The split is the whole point: a rejected login can be retried with a new
/// password, an unreachable service cannot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Connection failed: {0}")]
    Connection(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Please specify a task to run")]
    MissingTask,

    #[error("Cannot execute task named {name} (available: {})", available.join(", "))]
    UnknownTask {
        name: String,
        available: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, GatehouseError>;
