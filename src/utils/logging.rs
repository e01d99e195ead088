//! Logger setup.
//!
//! Records always go to stderr. With a log file they are also appended to it,
//! so an unattended pull leaves a trail next to its downloads.

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Writer that copies every record to stderr and to a file
pub struct Tee {
    file: File,
}

impl Tee {
    /// Open `path` for appending, creating it and its parent directory
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Install the global logger: `info` by default, `debug` when verbose
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(log_level));

    if let Some(path) = log_file {
        let tee = Tee::open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(tee)));
    }

    builder.init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_appends_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("logs/pull.log");

        let mut tee = Tee::open(&path).unwrap();
        tee.write_all(b"first\n").unwrap();
        tee.flush().unwrap();
        drop(tee);

        let mut tee = Tee::open(&path).unwrap();
        tee.write_all(b"second\n").unwrap();
        tee.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_tee_rejects_directory_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(Tee::open(temp_dir.path()).is_err());
    }
}
