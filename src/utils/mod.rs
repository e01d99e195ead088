//! Utility modules for configuration, logging and error handling.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used error types for convenience
pub use error::{CameraError, ConfigError, LayoutError, RemoteError, UsageError};
