use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use stereo_snap::commands::{execute_pull_with, PullArgs};
use stereo_snap::remote::{CommandOutput, Orchestrator, RemoteShell, RetryPolicy};
use stereo_snap::utils::error::RemoteError;

/// In-memory device: a map of remote files plus scripted command results
#[derive(Default)]
struct FakeShell {
    files: HashMap<String, Vec<u8>>,
    /// Exit statuses returned by successive `exec` calls; 0 once exhausted
    exec_statuses: RefCell<Vec<i32>>,
    /// Bytes dropped from the end of the next N downloads
    truncate_downloads: RefCell<u32>,
    commands: RefCell<Vec<String>>,
    downloads: RefCell<u32>,
}

impl FakeShell {
    fn with_file(mut self, path: &str, size: usize) -> Self {
        self.files.insert(path.to_string(), vec![0xff; size]);
        self
    }
}

impl RemoteShell for &FakeShell {
    fn exec(&self, command: &str) -> Result<CommandOutput, RemoteError> {
        self.commands.borrow_mut().push(command.to_string());
        let mut statuses = self.exec_statuses.borrow_mut();
        let status = if statuses.is_empty() { 0 } else { statuses.remove(0) };
        Ok(CommandOutput {
            status,
            stdout: String::new(),
            stderr: if status == 0 { String::new() } else { "boom".to_string() },
        })
    }

    fn file_size(&self, path: &str) -> Result<Option<u64>, RemoteError> {
        Ok(self.files.get(path).map(|f| f.len() as u64))
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), RemoteError> {
        *self.downloads.borrow_mut() += 1;
        let data = self
            .files
            .get(remote_path)
            .ok_or_else(|| RemoteError::TransferFailed(format!("{remote_path}: no such file")))?;

        let mut truncate = self.truncate_downloads.borrow_mut();
        let keep = if *truncate > 0 {
            *truncate -= 1;
            data.len() - 1
        } else {
            data.len()
        };
        std::fs::write(local_path, &data[..keep])?;
        Ok(())
    }
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::ZERO)
}

fn pull_args(local_root: &Path) -> PullArgs {
    PullArgs {
        host: "camera-pi".to_string(),
        unique_id: Some("C250416_v0.1".to_string()),
        epoch: Some("1700000000".to_string()),
        local_root: local_root.to_path_buf(),
        retry_delay: Duration::ZERO,
        command_delay: Duration::ZERO,
        max_retries: 3,
        ..Default::default()
    }
}

const LEFT: &str = "/home/pi/C250416_v0.1/left/C250416_v0.1_1700000000_left.jpg";
const RIGHT: &str = "/home/pi/C250416_v0.1/right/C250416_v0.1_1700000000_right.jpg";

#[test]
fn test_execute_retries_until_success() {
    let shell = FakeShell {
        exec_statuses: RefCell::new(vec![1, 1]),
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(&shell, fast_retry(3));

    assert!(orchestrator.execute("echo hi").is_ok());
    assert_eq!(shell.commands.borrow().len(), 3);
}

#[test]
fn test_execute_gives_up_after_max_retries() {
    let shell = FakeShell {
        exec_statuses: RefCell::new(vec![2, 2, 2]),
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(&shell, fast_retry(2));

    match orchestrator.execute("false") {
        Err(RemoteError::CommandFailed { status, stderr }) => {
            assert_eq!(status, 2);
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert_eq!(shell.commands.borrow().len(), 2);
}

#[test]
fn test_download_missing_remote_file_is_not_retried() {
    let temp_dir = tempfile::tempdir().unwrap();
    let shell = FakeShell::default();
    let orchestrator = Orchestrator::new(&shell, fast_retry(3));

    let ok = orchestrator
        .download("/home/pi/nope.jpg", &temp_dir.path().join("nope.jpg"))
        .unwrap();

    assert!(!ok);
    assert_eq!(*shell.downloads.borrow(), 0);
}

#[test]
fn test_download_size_mismatch_is_retried() {
    let temp_dir = tempfile::tempdir().unwrap();
    let local = temp_dir.path().join("a.jpg");
    let shell = FakeShell {
        truncate_downloads: RefCell::new(1),
        ..Default::default()
    }
    .with_file("/home/pi/a.jpg", 64);
    let orchestrator = Orchestrator::new(&shell, fast_retry(3));

    assert!(orchestrator.download("/home/pi/a.jpg", &local).unwrap());
    assert_eq!(*shell.downloads.borrow(), 2);
    assert_eq!(std::fs::metadata(&local).unwrap().len(), 64);
}

#[test]
fn test_download_persistent_mismatch_removes_local_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let local = temp_dir.path().join("a.jpg");
    let shell = FakeShell {
        truncate_downloads: RefCell::new(10),
        ..Default::default()
    }
    .with_file("/home/pi/a.jpg", 64);
    let orchestrator = Orchestrator::new(&shell, fast_retry(2));

    assert!(!orchestrator.download("/home/pi/a.jpg", &local).unwrap());
    assert_eq!(*shell.downloads.borrow(), 2);
    assert!(!local.exists());
}

#[test]
fn test_pull_downloads_both_images() {
    let temp_dir = tempfile::tempdir().unwrap();
    let shell = FakeShell::default().with_file(LEFT, 10).with_file(RIGHT, 20);

    let report = execute_pull_with(&pull_args(temp_dir.path()), &shell).unwrap();

    let left = temp_dir
        .path()
        .join("C250416_v0.1/left/C250416_v0.1_1700000000_left.jpg");
    let right = temp_dir
        .path()
        .join("C250416_v0.1/right/C250416_v0.1_1700000000_right.jpg");

    assert_eq!(report.epoch, "1700000000");
    assert_eq!(report.downloaded, vec![left.clone(), right.clone()]);
    assert_eq!(std::fs::metadata(left).unwrap().len(), 10);
    assert_eq!(std::fs::metadata(right).unwrap().len(), 20);

    let commands = shell.commands.borrow();
    assert!(commands
        .iter()
        .any(|c| c == "stereo-snap snap '1700000000' 'C250416_v0.1' --root '/home/pi'"));
}

#[test]
fn test_pull_attempts_right_even_if_left_missing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let shell = FakeShell::default().with_file(RIGHT, 20);

    let err = execute_pull_with(&pull_args(temp_dir.path()), &shell).unwrap_err();

    assert!(err.to_string().contains("1 of 2"));
    assert!(temp_dir
        .path()
        .join("C250416_v0.1/right/C250416_v0.1_1700000000_right.jpg")
        .is_file());
}

#[test]
fn test_pull_fails_when_device_unreachable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let shell = FakeShell {
        exec_statuses: RefCell::new(vec![255, 255, 255]),
        ..Default::default()
    };

    assert!(execute_pull_with(&pull_args(temp_dir.path()), &shell).is_err());
    // Only the connection check ran, never the snap command
    assert!(shell.commands.borrow().iter().all(|c| c == "true"));
    assert_eq!(*shell.downloads.borrow(), 0);
}
