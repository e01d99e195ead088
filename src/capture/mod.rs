//! Dual-camera snapshot capture: file layout and the capture sequence.

pub mod layout;
pub mod sequence;

pub use layout::{Side, SnapshotLayout};
pub use sequence::{run_sequence, CapturePolicy, CaptureReport, SideOutcome};
