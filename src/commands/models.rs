use crate::camera::FlagProfile;
use crate::capture::CapturePolicy;
use crate::utils::config::{
    DEFAULT_CAPTURE_TOOL, DEFAULT_COMMAND_DELAY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_LENS_POSITION,
    DEFAULT_LOCAL_ROOT, DEFAULT_MAX_RETRIES, DEFAULT_REMOTE_COMMAND, DEFAULT_REMOTE_ROOT,
    DEFAULT_RETRY_DELAY, DEFAULT_SSH_PORT, DEFAULT_SSH_USER,
};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the snap command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SnapArgs {
    /// Epoch used to name the images (required)
    pub epoch: Option<String>,

    /// Run identifier namespacing directories and file names
    pub unique_id: Option<String>,

    /// Directory the capture tree is created under
    pub root: PathBuf,

    /// Capture utility program
    pub tool: String,

    /// Flag profile; `None` picks one from the presence of a run id
    pub profile: Option<FlagProfile>,

    /// Lens position for the HDR profile
    pub lens_position: f32,

    /// What a failed left capture does to the right one
    pub policy: CapturePolicy,

    /// Treat any capture failure as a command failure
    pub strict: bool,
}

impl SnapArgs {
    /// Profile actually used for this run
    pub fn resolved_profile(&self) -> FlagProfile {
        self.profile
            .unwrap_or_else(|| FlagProfile::default_for(self.unique_id.as_deref()))
    }
}

impl Default for SnapArgs {
    fn default() -> Self {
        Self {
            epoch: None,
            unique_id: None,
            root: PathBuf::from("."),
            tool: DEFAULT_CAPTURE_TOOL.to_string(),
            profile: None,
            lens_position: DEFAULT_LENS_POSITION,
            policy: CapturePolicy::ShortCircuit,
            strict: false,
        }
    }
}

/// Arguments for the pull command
#[derive(Debug, Clone)]
pub struct PullArgs {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub identity_file: Option<PathBuf>,

    /// Answered through the askpass helper; key/agent auth when `None`
    pub password: Option<String>,

    /// Run identifier passed through to the device
    pub unique_id: Option<String>,

    /// Fixed epoch; generated from the clock when `None`
    pub epoch: Option<String>,

    /// Local directory downloads are placed under
    pub local_root: PathBuf,

    /// Directory on the device the capture tree lives under
    pub remote_root: String,

    /// Snap command run on the device
    pub remote_command: String,

    pub max_retries: u32,
    pub retry_delay: Duration,

    /// Wait between triggering the capture and downloading
    pub command_delay: Duration,

    pub connect_timeout: Duration,
}

impl Default for PullArgs {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SSH_PORT,
            user: DEFAULT_SSH_USER.to_string(),
            identity_file: None,
            password: None,
            unique_id: None,
            epoch: None,
            local_root: PathBuf::from(DEFAULT_LOCAL_ROOT),
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            remote_command: DEFAULT_REMOTE_COMMAND.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            command_delay: DEFAULT_COMMAND_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
