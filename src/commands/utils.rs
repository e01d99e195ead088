use crate::camera::FlagProfile;
use crate::utils::config::{DEFAULT_CAPTURE_TOOL, DEFAULT_LENS_POSITION};

/// Display version information
pub fn display_version() {
    println!("Stereo Snap v{}", env!("CARGO_PKG_VERSION"));
    println!("Capture tool: {}", DEFAULT_CAPTURE_TOOL);
    println!();
    println!("Dual-camera still capture for libcamera devices.");
}

/// Display the flags each profile passes to the capture tool
pub fn display_profiles() {
    for profile in [FlagProfile::Standard, FlagProfile::Hdr] {
        println!("{:<10} {}", profile.name(), profile.args(DEFAULT_LENS_POSITION).join(" "));
    }
}
