//! Error types for ghq-nav

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ghq-nav operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ghq-nav operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.code-workspace` file that is not plain JSON (no comments or
    /// trailing commas)
    #[error("Invalid workspace file {}: {source}", .path.display())]
    WorkspaceFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An external program could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command ran but exited unsuccessfully
    #[error("Command '{command}' failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host refused or failed an action
    #[error("Host error: {0}")]
    Host(String),

    /// A command id that is not registered in the current activation
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
