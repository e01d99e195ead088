//! Snap command implementation.
//!
//! The snap command:
//! 1. Validates the epoch and optional run id
//! 2. Creates the `left`/`right` output directories
//! 3. Captures camera 0 into `left`
//! 4. Captures camera 1 into `right` (only after a successful left capture,
//!    unless the independent policy is selected)

use super::models::SnapArgs;
use crate::camera::{Camera, LibcameraStill};
use crate::capture::{run_sequence, CaptureReport, SnapshotLayout};
use crate::utils::error::UsageError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// One-line usage text printed on a usage error
pub const SNAP_USAGE: &str = "Usage: stereo-snap snap <epoch> [unique_id]";

/// Execute the snap command with the real capture utility
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The per-camera report. Capture failures are part of the report, not an
/// error, unless `strict` is set.
///
/// # Errors
/// * Usage errors (see [`validate_args`])
/// * Output directory creation failures
/// * Any camera not capturing when `strict` is set
pub fn execute_snap(args: SnapArgs) -> Result<CaptureReport> {
    let profile = args.resolved_profile();
    let mut camera = LibcameraStill::new(args.tool.clone(), profile, args.lens_position);

    info!("Using `{}` with the {} profile", camera.program(), profile);

    execute_snap_with(&args, &mut camera)
}

/// Execute the snap command against any camera backend
pub fn execute_snap_with<C: Camera + ?Sized>(args: &SnapArgs, camera: &mut C) -> Result<CaptureReport> {
    let start_time = Instant::now();

    validate_args(args)?;

    let epoch = args.epoch.clone().unwrap_or_default();
    let layout = SnapshotLayout::new(args.root.clone(), epoch, args.unique_id.clone());

    info!(
        "Starting snapshot for epoch {}{}",
        layout.epoch(),
        layout
            .unique_id()
            .map(|uid| format!(" (run {uid})"))
            .unwrap_or_default()
    );

    layout
        .ensure_dirs()
        .context("Failed to prepare output directories")?;

    let report = run_sequence(camera, &layout, args.policy);

    if report.all_captured() {
        info!("Both images captured");
    } else if args.strict {
        anyhow::bail!("{} of 2 images captured", report.captured_count());
    } else {
        warn!("{} of 2 images captured", report.captured_count());
    }

    debug!("Snapshot finished in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Validate snap arguments
///
/// **Public** - called before execute_snap so main can print usage
///
/// The epoch is required; the run id is optional but must not be empty when
/// given. Any string is accepted as long as it stays a single path component.
pub fn validate_args(args: &SnapArgs) -> Result<(), UsageError> {
    match args.epoch.as_deref() {
        None | Some("") => return Err(UsageError::MissingArgument("epoch")),
        Some(epoch) => check_path_component("epoch", epoch)?,
    }

    if let Some(uid) = args.unique_id.as_deref() {
        if uid.is_empty() {
            return Err(UsageError::MissingArgument("unique_id"));
        }
        check_path_component("unique_id", uid)?;
    }

    Ok(())
}

/// Reject values that would not stay a single file name component
pub(crate) fn check_path_component(name: &'static str, value: &str) -> Result<(), UsageError> {
    if value.contains(['/', '\0']) || value == "." || value == ".." {
        return Err(UsageError::InvalidArgument {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}
