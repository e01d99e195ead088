//! Configuration and constants for the CLI.
//!
//! Every field of the optional TOML file has a default, so an empty file
//! (or no file at all) yields the stock device setup. Command-line flags
//! override whatever the file sets.

use super::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Still-capture utility invoked for each camera
pub const DEFAULT_CAPTURE_TOOL: &str = "libcamera-still";

/// Camera index wired to the left lens
pub const LEFT_CAMERA_INDEX: u32 = 0;

/// Camera index wired to the right lens
pub const RIGHT_CAMERA_INDEX: u32 = 1;

/// Extension of every captured image
pub const IMAGE_EXTENSION: &str = "jpg";

/// Manual focus distance used by the HDR profile (dioptres)
pub const DEFAULT_LENS_POSITION: f32 = 2.0;

// Remote orchestrator defaults
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_SSH_USER: &str = "pi";
pub const DEFAULT_REMOTE_ROOT: &str = "/home/pi";
pub const DEFAULT_REMOTE_COMMAND: &str = "stereo-snap snap";
pub const DEFAULT_LOCAL_ROOT: &str = "downloaded_images";
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_COMMAND_DELAY: Duration = Duration::from_secs(15);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Top-level config file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub capture: CaptureConfig,
    pub remote: RemoteConfig,
}

/// `[capture]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Capture utility program name or path
    pub tool: String,

    /// Directory the `left`/`right` tree is created under
    pub root: PathBuf,

    /// Flag profile name; `None` picks one from the presence of a run id
    pub profile: Option<String>,

    /// Lens position for the HDR profile
    pub lens_position: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_CAPTURE_TOOL.to_string(),
            root: PathBuf::from("."),
            profile: None,
            lens_position: DEFAULT_LENS_POSITION,
        }
    }
}

/// `[remote]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub identity_file: Option<PathBuf>,

    /// Password for devices without key auth; prefer `STEREO_SNAP_PASSWORD`
    pub password: Option<String>,

    /// Directory on the device the capture tree is rooted at
    pub remote_root: String,

    /// Command run on the device; epoch, run id and `--root` are appended
    pub remote_command: String,

    pub local_root: PathBuf,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub command_delay_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SSH_PORT,
            user: DEFAULT_SSH_USER.to_string(),
            identity_file: None,
            password: None,
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            remote_command: DEFAULT_REMOTE_COMMAND.to_string(),
            local_root: PathBuf::from(DEFAULT_LOCAL_ROOT),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY.as_secs(),
            command_delay_secs: DEFAULT_COMMAND_DELAY.as_secs(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

/// Load a config file from disk
///
/// # Errors
/// * `ConfigError::ReadFailed` - file missing or unreadable
/// * `ConfigError::ParseFailed` - not valid TOML or unknown keys
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    debug!("Loading config from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse config text
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Load the file when a path was given, otherwise fall back to defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}
