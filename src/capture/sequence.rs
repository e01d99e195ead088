//! The left-then-right capture sequence.
//!
//! Under [`CapturePolicy::ShortCircuit`] the right camera is only attempted
//! after the left one succeeded. [`CapturePolicy::Independent`] attempts both
//! and reports each outcome.

use super::layout::{Side, SnapshotLayout};
use crate::camera::Camera;
use colored::*;
use log::{error, info, warn};
use std::path::PathBuf;

/// How a failed left capture affects the right one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePolicy {
    /// Skip the right camera when the left one fails
    #[default]
    ShortCircuit,
    /// Always attempt both cameras
    Independent,
}

/// Result for one camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideOutcome {
    Captured(PathBuf),
    Failed(String),
    /// Not attempted because an earlier capture failed
    Skipped,
}

impl SideOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, SideOutcome::Captured(_))
    }
}

/// Outcomes of both cameras for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub left: SideOutcome,
    pub right: SideOutcome,
}

impl CaptureReport {
    pub fn outcome(&self, side: Side) -> &SideOutcome {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn all_captured(&self) -> bool {
        self.left.is_captured() && self.right.is_captured()
    }

    pub fn captured_count(&self) -> usize {
        Side::ALL
            .iter()
            .filter(|side| self.outcome(**side).is_captured())
            .count()
    }
}

/// Capture both cameras in order, printing one line per camera to stdout
///
/// Capture failures never abort the run; they are recorded in the report.
/// The output directories must already exist.
pub fn run_sequence<C: Camera + ?Sized>(
    camera: &mut C,
    layout: &SnapshotLayout,
    policy: CapturePolicy,
) -> CaptureReport {
    let left = capture_side(camera, layout, Side::Left);

    let right = if left.is_captured() || policy == CapturePolicy::Independent {
        capture_side(camera, layout, Side::Right)
    } else {
        warn!("Left capture failed; not attempting the right camera");
        println!("{} {} camera skipped", "-".yellow(), Side::Right);
        SideOutcome::Skipped
    };

    CaptureReport { left, right }
}

fn capture_side<C: Camera + ?Sized>(camera: &mut C, layout: &SnapshotLayout, side: Side) -> SideOutcome {
    let index = side.camera_index();
    let path = layout.output_path(side);

    info!("Capturing {side} image from camera {index} to {}", path.display());

    match camera.capture(index, &path) {
        Ok(()) => {
            println!(
                "{} {} image captured successfully: {}",
                "✓".green(),
                side,
                path.display().to_string().cyan()
            );
            SideOutcome::Captured(path)
        }
        Err(e) => {
            error!("Camera {index} ({side}) capture failed: {e}");
            println!("{} Failed to capture {} image: {}", "✗".red(), side, e);
            SideOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CameraError;
    use std::path::Path;

    /// Records calls; fails the camera indices listed in `fail`
    struct StubCamera {
        calls: Vec<(u32, PathBuf)>,
        fail: Vec<u32>,
    }

    impl Camera for StubCamera {
        fn capture(&mut self, index: u32, output: &Path) -> Result<(), CameraError> {
            self.calls.push((index, output.to_path_buf()));
            if self.fail.contains(&index) {
                Err(CameraError::Exited(Some(255)))
            } else {
                Ok(())
            }
        }
    }

    fn layout() -> SnapshotLayout {
        SnapshotLayout::new("snaps", "42", None)
    }

    #[test]
    fn test_short_circuit_skips_right() {
        let mut cam = StubCamera { calls: vec![], fail: vec![0] };
        let report = run_sequence(&mut cam, &layout(), CapturePolicy::ShortCircuit);

        assert_eq!(cam.calls.len(), 1);
        assert!(matches!(report.left, SideOutcome::Failed(_)));
        assert_eq!(report.right, SideOutcome::Skipped);
        assert_eq!(report.captured_count(), 0);
    }

    #[test]
    fn test_independent_attempts_both() {
        let mut cam = StubCamera { calls: vec![], fail: vec![0] };
        let report = run_sequence(&mut cam, &layout(), CapturePolicy::Independent);

        assert_eq!(cam.calls.len(), 2);
        assert!(report.right.is_captured());
        assert!(!report.all_captured());
    }

    #[test]
    fn test_right_failure_is_reported() {
        let mut cam = StubCamera { calls: vec![], fail: vec![1] };
        let report = run_sequence(&mut cam, &layout(), CapturePolicy::ShortCircuit);

        assert!(report.left.is_captured());
        match &report.right {
            SideOutcome::Failed(reason) => assert!(reason.contains("255")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
