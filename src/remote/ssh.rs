//! `RemoteShell` backed by the system OpenSSH client.
//!
//! Without a password, authentication is whatever `ssh` resolves on its own
//! (agent, keys, `~/.ssh/config`) and `BatchMode` is on so a missing key fails
//! fast instead of blocking on a prompt. With a password, the prompt is
//! answered through the askpass helper and never reaches the terminal.

use super::{askpass, CommandOutput, RemoteShell};
use crate::utils::error::RemoteError;
use log::{debug, trace};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Connection details for the capture device
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteHost {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub identity_file: Option<PathBuf>,
    pub password: Option<String>,
}

impl fmt::Debug for RemoteHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteHost")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("identity_file", &self.identity_file)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RemoteHost {
    /// `user@host`
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

#[derive(Debug, Clone)]
pub struct OpenSsh {
    remote: RemoteHost,
    connect_timeout: Duration,
}

impl OpenSsh {
    pub fn new(remote: RemoteHost, connect_timeout: Duration) -> Self {
        Self {
            remote,
            connect_timeout,
        }
    }

    /// Options shared by ssh and scp
    fn common_options(&self) -> Vec<String> {
        let mut opts = Vec::new();
        if self.remote.password.is_some() {
            opts.extend([
                "-o".to_string(),
                "BatchMode=no".to_string(),
                "-o".to_string(),
                "PreferredAuthentications=password,keyboard-interactive".to_string(),
                "-o".to_string(),
                "NumberOfPasswordPrompts=1".to_string(),
            ]);
        } else {
            opts.extend(["-o".to_string(), "BatchMode=yes".to_string()]);
        }
        opts.extend([
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
        ]);
        if let Some(identity) = &self.remote.identity_file {
            opts.push("-i".to_string());
            opts.push(identity.display().to_string());
        }
        opts
    }

    pub fn ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = self.common_options();
        args.push("-p".to_string());
        args.push(self.remote.port.to_string());
        args.push(self.remote.destination());
        args.push(command.to_string());
        args
    }

    pub fn scp_args(&self, remote_path: &str, local_path: &Path) -> Vec<String> {
        let mut args = self.common_options();
        args.push("-P".to_string());
        args.push(self.remote.port.to_string());
        args.push(format!("{}:{}", self.remote.destination(), remote_path));
        args.push(local_path.display().to_string());
        args
    }

    /// `program` with the askpass environment applied when a password is set
    fn command(&self, program: &str, args: &[String]) -> Result<Command, RemoteError> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(password) = &self.remote.password {
            command.envs(askpass::helper_env(password)?).stdin(Stdio::null());
        }
        Ok(command)
    }
}

impl RemoteShell for OpenSsh {
    fn exec(&self, command: &str) -> Result<CommandOutput, RemoteError> {
        let args = self.ssh_args(command);
        trace!("ssh {}", args.join(" "));

        let output = self
            .command("ssh", &args)?
            .output()
            .map_err(|source| RemoteError::Spawn {
                program: "ssh".to_string(),
                source,
            })?;

        Ok(CommandOutput {
            // ssh reports its own failures as 255; a signal has no code
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn file_size(&self, path: &str) -> Result<Option<u64>, RemoteError> {
        let quoted = shell_quote(path);
        let script = format!("if [ -f {quoted} ]; then stat -c %s {quoted}; else echo missing; fi");
        let output = self.exec(&script)?;

        if output.status != 0 {
            return Err(RemoteError::CommandFailed {
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        parse_size_reply(&output.stdout)
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), RemoteError> {
        let args = self.scp_args(remote_path, local_path);
        debug!("scp {}", args.join(" "));

        let output = self
            .command("scp", &args)?
            .output()
            .map_err(|source| RemoteError::Spawn {
                program: "scp".to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RemoteError::TransferFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

/// Interpret the output of the size check run by `file_size`
fn parse_size_reply(stdout: &str) -> Result<Option<u64>, RemoteError> {
    match stdout.trim() {
        "missing" => Ok(None),
        size => size
            .parse::<u64>()
            .map(Some)
            .map_err(|_| RemoteError::InvalidResponse(format!("expected a file size, got `{size}`"))),
    }
}

/// Single-quote a string for a POSIX shell
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
