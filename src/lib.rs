//! Stereo Snap
//!
//! Dual-camera still capture for libcamera devices.
//!
//! On the device, `stereo-snap snap <epoch> [unique_id]` captures camera 0
//! into `left/` and camera 1 into `right/`. From a workstation,
//! `stereo-snap pull --host <device>` triggers the same capture over ssh and
//! copies both images back with scp.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install --path .
//! stereo-snap --help
//! ```

pub mod camera;
pub mod capture;
pub mod commands;
pub mod remote;
pub mod utils;
