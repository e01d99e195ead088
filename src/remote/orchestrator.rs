//! Retrying wrapper around a [`RemoteShell`].

use super::RemoteShell;
use crate::utils::error::RemoteError;
use log::{error, info, warn};
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

/// How many times to try a remote operation and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            retry_delay,
        }
    }
}

pub struct Orchestrator<S: RemoteShell> {
    shell: S,
    retry: RetryPolicy,
}

impl<S: RemoteShell> Orchestrator<S> {
    pub fn new(shell: S, retry: RetryPolicy) -> Self {
        Self { shell, retry }
    }

    /// Check the device is reachable, retrying per the policy
    pub fn connect(&self) -> Result<(), RemoteError> {
        self.with_retries("SSH connection", || {
            let output = self.shell.exec("true")?;
            if output.status == 0 {
                Ok(())
            } else {
                Err(RemoteError::CommandFailed {
                    status: output.status,
                    stderr: output.stderr.trim().to_string(),
                })
            }
        })?;
        info!("SSH connection established");
        Ok(())
    }

    /// Run a command on the device, retrying on failure
    ///
    /// Returns trimmed stdout, `None` if empty. Anything on stderr is logged
    /// as a warning; a non-zero exit status counts as a failed attempt.
    pub fn execute(&self, command: &str) -> Result<Option<String>, RemoteError> {
        self.with_retries("Command execution", || {
            info!("Executing remote command: {command}");
            let output = self.shell.exec(command)?;

            let stderr = output.stderr.trim();
            if !stderr.is_empty() {
                warn!("Command produced stderr output: {stderr}");
            }

            if output.status != 0 {
                return Err(RemoteError::CommandFailed {
                    status: output.status,
                    stderr: stderr.to_string(),
                });
            }

            let stdout = output.stdout.trim();
            Ok((!stdout.is_empty()).then(|| stdout.to_string()))
        })
    }

    /// Whether `remote_path` is an existing regular file
    ///
    /// Lookup failures are logged and reported as "does not exist".
    pub fn remote_file_exists(&self, remote_path: &str) -> bool {
        match self.shell.file_size(remote_path) {
            Ok(size) => size.is_some(),
            Err(e) => {
                error!("Error checking remote file existence: {e}");
                false
            }
        }
    }

    /// Download a file and verify its size against the remote copy
    ///
    /// Returns `Ok(false)` straight away when the remote file does not exist,
    /// and after the last attempt when sizes kept mismatching. A mismatched
    /// local file is deleted before the next attempt. Transport errors are
    /// retried and returned once attempts run out.
    pub fn download(&self, remote_path: &str, local_path: &Path) -> Result<bool, RemoteError> {
        if !self.remote_file_exists(remote_path) {
            error!("Remote file does not exist: {remote_path}");
            return Ok(false);
        }

        for attempt in 1..=self.retry.max_retries {
            let last = attempt == self.retry.max_retries;
            info!(
                "Attempting download (attempt {attempt}/{}): {remote_path} -> {}",
                self.retry.max_retries,
                local_path.display()
            );

            match self.download_once(remote_path, local_path) {
                Ok(true) => {
                    info!("Download completed and verified");
                    return Ok(true);
                }
                Ok(false) => {
                    if last {
                        return Ok(false);
                    }
                }
                Err(e) => {
                    error!("Download failed (attempt {attempt}): {e}");
                    if last {
                        return Err(e);
                    }
                }
            }

            sleep(self.retry.retry_delay);
        }

        Ok(false)
    }

    /// One transfer plus size check; `Ok(false)` on a verification failure
    fn download_once(&self, remote_path: &str, local_path: &Path) -> Result<bool, RemoteError> {
        let remote_size = self.shell.file_size(remote_path)?.ok_or_else(|| {
            RemoteError::TransferFailed(format!("{remote_path} disappeared from the device"))
        })?;

        self.shell.download(remote_path, local_path)?;

        if !local_path.exists() {
            error!("Downloaded file not found at {}", local_path.display());
            return Ok(false);
        }

        let local_size = std::fs::metadata(local_path)?.len();
        if local_size == remote_size {
            return Ok(true);
        }

        error!("File size mismatch: remote={remote_size}, local={local_size}");
        std::fs::remove_file(local_path)?;
        Ok(false)
    }

    fn with_retries<T>(
        &self,
        what: &str,
        mut op: impl FnMut() -> Result<T, RemoteError>,
    ) -> Result<T, RemoteError> {
        let max = self.retry.max_retries;
        let mut attempt = 1;
        loop {
            info!("{what} (attempt {attempt}/{max})");
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max => {
                    error!("{what} failed (attempt {attempt}): {e}");
                    return Err(e);
                }
                Err(e) => {
                    error!("{what} failed (attempt {attempt}): {e}");
                    sleep(self.retry.retry_delay);
                    attempt += 1;
                }
            }
        }
    }
}
