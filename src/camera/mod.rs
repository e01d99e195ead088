//! Camera backends.
//!
//! The capture sequence only needs "take a picture with camera N into this
//! path", so that is all the [`Camera`] trait asks for. The real backend runs
//! the external still-capture utility; tests substitute a stub.

pub mod libcamera;
pub mod profile;

pub use libcamera::LibcameraStill;
pub use profile::FlagProfile;

use crate::utils::error::CameraError;
use std::path::Path;

/// A device that can write one still image per call
pub trait Camera {
    /// Capture a single frame from camera `index` into `output`
    ///
    /// Blocks until the capture finishes. `Ok` means the image was written.
    fn capture(&mut self, index: u32, output: &Path) -> Result<(), CameraError>;
}
