//! Pull command implementation.
//!
//! The pull command:
//! 1. Prepares the local `left`/`right` download directories
//! 2. Checks the device is reachable over ssh
//! 3. Runs the snap command on the device with a fresh epoch
//! 4. Waits for the device to finish writing
//! 5. Downloads and verifies both images over scp

use super::models::PullArgs;
use super::snap::check_path_component;
use crate::capture::{Side, SnapshotLayout};
use crate::remote::{shell_quote, OpenSsh, Orchestrator, RemoteHost, RemoteShell, RetryPolicy};
use crate::utils::error::UsageError;
use anyhow::{Context, Result};
use colored::*;
use log::{error, info};
use std::path::PathBuf;
use std::thread::sleep;

/// Images fetched by a pull run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub epoch: String,
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Execute the pull command over the system ssh/scp clients
pub fn execute_pull(args: PullArgs) -> Result<PullReport> {
    let remote = RemoteHost {
        host: args.host.clone(),
        port: args.port,
        user: args.user.clone(),
        identity_file: args.identity_file.clone(),
        password: args.password.clone(),
    };
    let shell = OpenSsh::new(remote, args.connect_timeout);

    execute_pull_with(&args, shell)
}

/// Execute the pull command against any remote shell
///
/// # Errors
/// * Usage errors (see [`validate_pull_args`])
/// * The device is unreachable or the snap command keeps failing
/// * Either image could not be downloaded
pub fn execute_pull_with<S: RemoteShell>(args: &PullArgs, shell: S) -> Result<PullReport> {
    validate_pull_args(args)?;

    let epoch = args
        .epoch
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().timestamp().to_string());

    let local = SnapshotLayout::new(args.local_root.clone(), epoch.clone(), args.unique_id.clone());
    local
        .ensure_dirs()
        .context("Failed to prepare local download directories")?;

    let orchestrator = Orchestrator::new(shell, RetryPolicy::new(args.max_retries, args.retry_delay));

    orchestrator
        .connect()
        .with_context(|| format!("Could not reach {}@{}", args.user, args.host))?;

    let command = remote_snap_command(args, &epoch);
    info!("Executing snapshot command on device...");
    if let Some(output) = orchestrator
        .execute(&command)
        .context("Snapshot command failed on the device")?
    {
        info!("Device output:\n{output}");
    }

    info!("Waiting {}s for the device to finish", args.command_delay.as_secs());
    sleep(args.command_delay);

    let mut report = PullReport {
        epoch,
        downloaded: Vec::new(),
        failed: Vec::new(),
    };

    for side in Side::ALL {
        let remote_path = remote_image_path(args, &local, side);
        let local_path = local.output_path(side);

        match orchestrator.download(&remote_path, &local_path) {
            Ok(true) => {
                println!(
                    "{} Downloaded {} image to {}",
                    "✓".green(),
                    side,
                    local_path.display().to_string().cyan()
                );
                report.downloaded.push(local_path);
            }
            Ok(false) => {
                println!("{} Failed to download {}", "✗".red(), remote_path);
                report.failed.push(remote_path);
            }
            Err(e) => {
                error!("Download of {remote_path} failed: {e}");
                println!("{} Failed to download {}: {}", "✗".red(), remote_path, e);
                report.failed.push(remote_path);
            }
        }
    }

    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} of 2 images failed to download: {}",
            report.failed.len(),
            report.failed.join(", ")
        );
    }

    info!("All images downloaded successfully");
    Ok(report)
}

/// Validate pull arguments
pub fn validate_pull_args(args: &PullArgs) -> Result<(), UsageError> {
    if args.host.trim().is_empty() {
        return Err(UsageError::MissingArgument("host"));
    }
    if args.user.trim().is_empty() {
        return Err(UsageError::MissingArgument("user"));
    }
    if let Some(uid) = args.unique_id.as_deref() {
        if uid.is_empty() {
            return Err(UsageError::MissingArgument("unique_id"));
        }
        check_path_component("unique_id", uid)?;
    }
    if let Some(epoch) = args.epoch.as_deref() {
        if epoch.is_empty() {
            return Err(UsageError::MissingArgument("epoch"));
        }
        check_path_component("epoch", epoch)?;
    }
    Ok(())
}

/// Shell command that runs the snap command on the device
pub fn remote_snap_command(args: &PullArgs, epoch: &str) -> String {
    let mut command = format!("{} {}", args.remote_command, shell_quote(epoch));
    if let Some(uid) = &args.unique_id {
        command.push(' ');
        command.push_str(&shell_quote(uid));
    }
    command.push_str(" --root ");
    command.push_str(&shell_quote(&args.remote_root));
    command
}

/// Where the device wrote the image for `side`
///
/// Reuses the local layout's relative path since both ends share the
/// naming scheme.
fn remote_image_path(args: &PullArgs, layout: &SnapshotLayout, side: Side) -> String {
    format!(
        "{}/{}",
        args.remote_root.trim_end_matches('/'),
        layout.relative_path(side)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PullArgs {
        PullArgs {
            host: "192.168.0.105".to_string(),
            unique_id: Some("C250416_v0.1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_remote_snap_command() {
        assert_eq!(
            remote_snap_command(&args(), "1700000000"),
            "stereo-snap snap '1700000000' 'C250416_v0.1' --root '/home/pi'"
        );

        let no_uid = PullArgs {
            unique_id: None,
            ..args()
        };
        assert_eq!(
            remote_snap_command(&no_uid, "17"),
            "stereo-snap snap '17' --root '/home/pi'"
        );

        let odd = PullArgs {
            unique_id: Some("it's; rm".to_string()),
            ..args()
        };
        assert_eq!(
            remote_snap_command(&odd, "1 2"),
            r"stereo-snap snap '1 2' 'it'\''s; rm' --root '/home/pi'"
        );
    }

    #[test]
    fn test_remote_image_path() {
        let layout = SnapshotLayout::new("downloaded_images", "17", Some("runA".to_string()));
        let a = PullArgs {
            remote_root: "/home/pi/".to_string(),
            ..args()
        };
        assert_eq!(
            remote_image_path(&a, &layout, Side::Right),
            "/home/pi/runA/right/runA_17_right.jpg"
        );
    }

    #[test]
    fn test_validate_pull_args() {
        assert!(validate_pull_args(&args()).is_ok());
        assert_eq!(
            validate_pull_args(&PullArgs::default()),
            Err(UsageError::MissingArgument("host"))
        );
        let bad_uid = PullArgs {
            unique_id: Some("../etc".to_string()),
            ..args()
        };
        assert!(validate_pull_args(&bad_uid).is_err());
        let spaced_epoch = PullArgs {
            epoch: Some("2024-01-01 12:00".to_string()),
            ..args()
        };
        assert!(validate_pull_args(&spaced_epoch).is_ok());
    }
}
