//! Process-backed camera that shells out to `libcamera-still`.

use super::{Camera, FlagProfile};
use crate::utils::error::CameraError;
use log::{debug, trace};
use std::path::Path;
use std::process::Command;

/// Runs the external still-capture utility once per capture
///
/// The child inherits stdio and blocks until it exits; its exit status
/// is the only thing inspected.
#[derive(Debug, Clone)]
pub struct LibcameraStill {
    program: String,
    flags: Vec<String>,
}

impl LibcameraStill {
    pub fn new(program: impl Into<String>, profile: FlagProfile, lens_position: f32) -> Self {
        Self {
            program: program.into(),
            flags: profile.args(lens_position),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for one capture
    pub fn build_args(&self, index: u32, output: &Path) -> Vec<String> {
        let mut args = self.flags.clone();
        args.push("--camera".to_string());
        args.push(index.to_string());
        args.push("-o".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Camera for LibcameraStill {
    fn capture(&mut self, index: u32, output: &Path) -> Result<(), CameraError> {
        let args = self.build_args(index, output);
        debug!("Image capture command = `{} {}`", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| CameraError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        trace!("{} exited with {status}", self.program);

        if status.success() {
            Ok(())
        } else {
            Err(CameraError::Exited(status.code()))
        }
    }
}
