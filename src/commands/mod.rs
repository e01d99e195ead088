//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod pull;
pub mod snap;
pub mod utils;

// Re-export main command functions
pub use models::{PullArgs, SnapArgs};
pub use pull::{execute_pull, execute_pull_with, validate_pull_args, PullReport};
pub use snap::{execute_snap, execute_snap_with, validate_args, SNAP_USAGE};
pub use utils::{display_profiles, display_version};
