//! Remote orchestration: trigger a capture on the device and fetch the images.
//!
//! Transport is delegated to the system `ssh`/`scp` binaries through the
//! [`RemoteShell`] trait, which tests replace with an in-memory fake.

pub mod askpass;
pub mod orchestrator;
pub mod ssh;

pub use orchestrator::{Orchestrator, RetryPolicy};
pub use ssh::{shell_quote, OpenSsh, RemoteHost};

use crate::utils::error::RemoteError;
use std::path::Path;

/// Captured result of a command run on the device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Minimal remote operations the orchestrator needs
pub trait RemoteShell {
    /// Run a shell command on the device and wait for it
    ///
    /// A non-zero remote exit status is returned in the output, not as an
    /// error; `Err` means the command could not be run at all.
    fn exec(&self, command: &str) -> Result<CommandOutput, RemoteError>;

    /// Size of a regular file on the device, `None` if there is no such file
    fn file_size(&self, path: &str) -> Result<Option<u64>, RemoteError>;

    /// Copy a file from the device to `local_path`
    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), RemoteError>;
}
