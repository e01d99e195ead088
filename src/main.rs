//! Stereo Snap CLI
//!
//! Captures a left/right image pair from a dual-camera device, either
//! locally or by driving the device over ssh.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use stereo_snap::camera::FlagProfile;
use stereo_snap::capture::CapturePolicy;
use stereo_snap::commands::{
    display_profiles, display_version, execute_pull, execute_snap, validate_args,
    validate_pull_args, PullArgs, SnapArgs, SNAP_USAGE,
};
use stereo_snap::remote::askpass;
use stereo_snap::utils::config::load_or_default;
use stereo_snap::utils::logging::init_logging;

const PULL_USAGE: &str = "Usage: stereo-snap pull --host <HOST> [--unique-id <ID>]";

/// Stereo Snap - dual-camera still capture
#[derive(Parser, Debug)]
#[command(name = "stereo-snap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "STEREO_SNAP_CONFIG")]
    config: Option<PathBuf>,

    /// Also append log records to this file
    #[arg(long, global = true, env = "STEREO_SNAP_LOG_FILE")]
    log_file: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture one image from each camera on this device
    Snap {
        /// Timestamp or identifier used in the file names
        epoch: Option<String>,

        /// Run identifier; nests output under <unique_id>/
        unique_id: Option<String>,

        /// Directory the left/right tree is created under
        #[arg(long)]
        root: Option<PathBuf>,

        /// Capture flag profile (default: standard, or hdr with a run id)
        #[arg(long, value_enum)]
        profile: Option<FlagProfile>,

        /// Capture utility to invoke
        #[arg(long)]
        tool: Option<String>,

        /// Lens position used by the hdr profile
        #[arg(long)]
        lens_position: Option<f32>,

        /// Attempt the right camera even if the left one failed
        #[arg(long)]
        independent: bool,

        /// Exit non-zero if either image was not captured
        #[arg(long)]
        strict: bool,
    },

    /// Trigger a capture on a remote device and download both images
    Pull {
        /// Device hostname or address
        #[arg(long)]
        host: Option<String>,

        /// SSH port
        #[arg(short, long)]
        port: Option<u16>,

        /// SSH user
        #[arg(short, long)]
        user: Option<String>,

        /// SSH private key
        #[arg(short, long)]
        identity: Option<PathBuf>,

        /// SSH password, for devices without key auth
        #[arg(long, env = "STEREO_SNAP_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Run identifier passed to the device
        #[arg(long)]
        unique_id: Option<String>,

        /// Use this epoch instead of the current time
        #[arg(long)]
        epoch: Option<String>,

        /// Local directory for downloads
        #[arg(long)]
        local_root: Option<PathBuf>,

        /// Capture root on the device
        #[arg(long)]
        remote_root: Option<String>,

        /// Snap command to run on the device
        #[arg(long)]
        remote_command: Option<String>,

        /// Attempts per remote operation
        #[arg(long)]
        max_retries: Option<u32>,

        /// Seconds between attempts
        #[arg(long)]
        retry_delay: Option<u64>,

        /// Seconds to wait after triggering the capture
        #[arg(long)]
        command_delay: Option<u64>,
    },

    /// Show the capture flags of each profile
    Profiles,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Started by ssh/scp as the askpass helper: answer the prompt and leave
    if let Some(secret) = askpass::pending_reply() {
        println!("{secret}");
        return Ok(());
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = load_or_default(cli.config.as_deref()).context("Failed to load config")?;

    // Execute command
    match cli.command {
        Commands::Snap {
            epoch,
            unique_id,
            root,
            profile,
            tool,
            lens_position,
            independent,
            strict,
        } => {
            let profile = match profile {
                Some(p) => Some(p),
                None => config
                    .capture
                    .profile
                    .as_deref()
                    .map(str::parse::<FlagProfile>)
                    .transpose()?,
            };

            let args = SnapArgs {
                epoch,
                unique_id,
                root: root.unwrap_or(config.capture.root),
                tool: tool.unwrap_or(config.capture.tool),
                profile,
                lens_position: lens_position.unwrap_or(config.capture.lens_position),
                policy: if independent {
                    CapturePolicy::Independent
                } else {
                    CapturePolicy::ShortCircuit
                },
                strict,
            };

            // Usage errors print to stdout and exit 1 before anything is touched
            if let Err(e) = validate_args(&args) {
                println!("{SNAP_USAGE}");
                println!("Error: {e}");
                std::process::exit(1);
            }

            execute_snap(args)?;
        }

        Commands::Pull {
            host,
            port,
            user,
            identity,
            password,
            unique_id,
            epoch,
            local_root,
            remote_root,
            remote_command,
            max_retries,
            retry_delay,
            command_delay,
        } => {
            let remote = config.remote;
            let args = PullArgs {
                host: host.or(remote.host).unwrap_or_default(),
                port: port.unwrap_or(remote.port),
                user: user.unwrap_or(remote.user),
                identity_file: identity.or(remote.identity_file),
                password: password.or(remote.password),
                unique_id,
                epoch,
                local_root: local_root.unwrap_or(remote.local_root),
                remote_root: remote_root.unwrap_or(remote.remote_root),
                remote_command: remote_command.unwrap_or(remote.remote_command),
                max_retries: max_retries.unwrap_or(remote.max_retries),
                retry_delay: Duration::from_secs(retry_delay.unwrap_or(remote.retry_delay_secs)),
                command_delay: Duration::from_secs(
                    command_delay.unwrap_or(remote.command_delay_secs),
                ),
                connect_timeout: Duration::from_secs(remote.connect_timeout_secs),
            };

            if let Err(e) = validate_pull_args(&args) {
                println!("{PULL_USAGE}");
                println!("Error: {e}");
                std::process::exit(1);
            }

            execute_pull(args)?;
        }

        Commands::Profiles => {
            display_profiles();
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
