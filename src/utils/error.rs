//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// A required positional argument was missing or empty
#[derive(Error, Debug, PartialEq)]
pub enum UsageError {
    #[error("missing required argument <{0}>")]
    MissingArgument(&'static str),

    #[error("invalid <{name}> `{value}`: must not contain '/' or NUL, or be '.' or '..'")]
    InvalidArgument { name: &'static str, value: String },
}

/// Errors reported by a camera backend for a single capture
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("capture tool exited with status {}", describe_status(.0))]
    Exited(Option<i32>),
}

/// Exit code as text; `None` means the child was killed by a signal
fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// Errors that can occur while preparing the output directories
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path exists and is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Errors that can occur while talking to the capture device over ssh/scp
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("remote command failed with exit status {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },

    #[error("file transfer failed: {0}")]
    TransferFailed(String),

    #[error("unexpected output from remote: {0}")]
    InvalidResponse(String),

    #[error("local IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Unknown flag profile `{0}` (expected `standard` or `hdr`)")]
    UnknownProfile(String),
}
