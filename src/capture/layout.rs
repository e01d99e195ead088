//! Output directory and file naming for a snapshot pair.
//!
//! ```text
//! <root>/left/<epoch>_left.jpg                 (no run id)
//! <root>/<uid>/left/<uid>_<epoch>_left.jpg     (with run id)
//! ```

use crate::utils::config::{IMAGE_EXTENSION, LEFT_CAMERA_INDEX, RIGHT_CAMERA_INDEX};
use crate::utils::error::LayoutError;
use log::debug;
use std::fmt;
use std::path::PathBuf;

/// Which half of the stereo pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Capture order
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn camera_index(&self) -> u32 {
        match self {
            Side::Left => LEFT_CAMERA_INDEX,
            Side::Right => RIGHT_CAMERA_INDEX,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deterministic paths for one capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLayout {
    root: PathBuf,
    epoch: String,
    unique_id: Option<String>,
}

impl SnapshotLayout {
    pub fn new(root: impl Into<PathBuf>, epoch: impl Into<String>, unique_id: Option<String>) -> Self {
        Self {
            root: root.into(),
            epoch: epoch.into(),
            unique_id,
        }
    }

    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Image file name, without any directory
    pub fn file_name(&self, side: Side) -> String {
        match &self.unique_id {
            Some(uid) => format!("{}_{}_{}.{}", uid, self.epoch, side.label(), IMAGE_EXTENSION),
            None => format!("{}_{}.{}", self.epoch, side.label(), IMAGE_EXTENSION),
        }
    }

    /// Path of the image relative to the root, always `/`-separated
    ///
    /// Used to address the same file on a remote device.
    pub fn relative_path(&self, side: Side) -> String {
        match &self.unique_id {
            Some(uid) => format!("{}/{}/{}", uid, side.label(), self.file_name(side)),
            None => format!("{}/{}", side.label(), self.file_name(side)),
        }
    }

    /// Directory holding the image for `side`
    pub fn dir(&self, side: Side) -> PathBuf {
        let mut dir = self.root.clone();
        if let Some(uid) = &self.unique_id {
            dir.push(uid);
        }
        dir.push(side.label());
        dir
    }

    pub fn output_path(&self, side: Side) -> PathBuf {
        self.dir(side).join(self.file_name(side))
    }

    /// Create both side directories; existing directories are fine
    ///
    /// # Errors
    /// * `LayoutError::NotADirectory` - a file sits where a directory should be
    /// * `LayoutError::CreateDir` - creation failed (permissions, read-only fs)
    pub fn ensure_dirs(&self) -> Result<(), LayoutError> {
        for side in Side::ALL {
            let dir = self.dir(side);

            if dir.exists() && !dir.is_dir() {
                return Err(LayoutError::NotADirectory(dir));
            }

            debug!("Ensuring directory exists: {}", dir.display());
            std::fs::create_dir_all(&dir).map_err(|source| LayoutError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
