//! Error types for campus-shell
//!
//! Wraps store errors and terminal I/O errors, plus command-line parse
//! failures that never reach the store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    /// Store or storage error
    #[error("{0}")]
    Store(#[from] libcampus::CampusError),

    /// Terminal/IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output encoding error
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// The input line is not a valid command
    #[error("{0}")]
    Parse(String),
}

impl ShellError {
    /// Exit code used when the shell runs a single command non-interactively
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::Store(e) => e.exit_code(),
            ShellError::Parse(_) => 3,
            ShellError::Io(_) | ShellError::Encode(_) => 1,
        }
    }
}

/// Result type for shell operations
pub type Result<T> = std::result::Result<T, ShellError>;
