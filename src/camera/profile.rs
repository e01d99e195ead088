//! Named flag sets passed to the capture utility.

use crate::utils::error::ConfigError;
use std::fmt;
use std::str::FromStr;

const STANDARD_FLAGS: &[&str] = &[
    "--nopreview", "-t", "1000", "--quality", "95", "--shutter", "20000", "--gain", "1.0",
    "--awb", "daylight",
];

const HDR_FLAGS: &[&str] = &["--nopreview", "-t", "2000", "--hdr", "--autofocus-mode", "manual"];

/// Flag profile for the capture utility
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FlagProfile {
    /// Fixed exposure, gain and JPEG quality; used for plain epoch runs
    Standard,
    /// HDR with manual focus at a fixed lens position; used for named runs
    Hdr,
}

impl FlagProfile {
    /// Profile used when none was requested explicitly
    pub fn default_for(unique_id: Option<&str>) -> Self {
        match unique_id {
            Some(_) => FlagProfile::Hdr,
            None => FlagProfile::Standard,
        }
    }

    /// Flags for this profile, excluding camera index and output path
    pub fn args(&self, lens_position: f32) -> Vec<String> {
        let (fixed, focus) = match self {
            FlagProfile::Standard => (STANDARD_FLAGS, None),
            FlagProfile::Hdr => (HDR_FLAGS, Some(lens_position)),
        };

        let mut flags: Vec<String> = fixed.iter().map(|s| s.to_string()).collect();
        if let Some(position) = focus {
            flags.push("--lens-position".to_string());
            flags.push(position.to_string());
        }
        flags
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlagProfile::Standard => "standard",
            FlagProfile::Hdr => "hdr",
        }
    }
}

impl fmt::Display for FlagProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlagProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(FlagProfile::Standard),
            "hdr" => Ok(FlagProfile::Hdr),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_follows_run_id() {
        assert_eq!(FlagProfile::default_for(None), FlagProfile::Standard);
        assert_eq!(FlagProfile::default_for(Some("runA")), FlagProfile::Hdr);
    }

    #[test]
    fn test_hdr_carries_lens_position() {
        let args = FlagProfile::Hdr.args(3.5);
        assert!(args.contains(&"--hdr".to_string()));
        let pos = args.iter().position(|a| a == "--lens-position").unwrap();
        assert_eq!(args[pos + 1], "3.5");
    }

    #[test]
    fn test_standard_has_no_focus_flags() {
        let args = FlagProfile::Standard.args(3.5);
        assert!(!args.iter().any(|a| a == "--lens-position" || a == "--hdr"));
        assert!(args.contains(&"--quality".to_string()));
    }

    #[test]
    fn test_parse_profile() {
        assert_eq!("HDR".parse::<FlagProfile>().unwrap(), FlagProfile::Hdr);
        assert_eq!(" standard ".parse::<FlagProfile>().unwrap(), FlagProfile::Standard);
        assert!("night".parse::<FlagProfile>().is_err());
    }
}
