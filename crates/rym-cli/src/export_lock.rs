//! One `rym sync` per export directory.
//!
//! The lock is a file holding the owner's pid, created with `create_new` so
//! that exactly one process wins. A file whose pid no longer runs is taken
//! over; a live owner is waited on for a bounded time.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_NAME: &str = ".rym.lock";
const WAIT_LIMIT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("export directory {root} is in use by rym process {pid}")]
    Busy { root: PathBuf, pid: u32 },

    #[error("lock file {path} has no readable owner; delete it if no rym sync is running")]
    Unreadable { path: PathBuf },

    #[error("cannot create lock file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Who currently holds an existing lock file.
#[derive(Debug, PartialEq, Eq)]
enum Owner {
    Running(u32),
    Gone(u32),
    Unreadable,
}

/// Held for the lifetime of a sync; dropping it removes the lock file.
#[derive(Debug)]
pub struct ExportLock {
    path: PathBuf,
}

impl ExportLock {
    /// Lock `export_root`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`LockError::Busy`] or [`LockError::Unreadable`] once the wait limit
    /// passes, [`LockError::Io`] if the lock file cannot be created at all.
    pub async fn acquire(export_root: &Path) -> Result<Self, LockError> {
        let path = export_root.join(LOCK_NAME);
        let deadline = Instant::now() + WAIT_LIMIT;

        loop {
            let owner = match Self::try_create(&path)? {
                Some(lock) => return Ok(lock),
                None => read_owner(&path),
            };

            match owner {
                Owner::Gone(pid) => {
                    tracing::warn!(
                        pid,
                        path = %path.display(),
                        "taking over lock of exited process"
                    );
                    let _ = fs::remove_file(&path);
                }
                Owner::Running(pid) if Instant::now() >= deadline => {
                    return Err(LockError::Busy {
                        root: export_root.to_path_buf(),
                        pid,
                    });
                }
                Owner::Unreadable if Instant::now() >= deadline => {
                    return Err(LockError::Unreadable { path });
                }
                Owner::Running(_) | Owner::Unreadable => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }

    /// `Ok(None)` when the lock file already exists.
    fn try_create(path: &Path) -> Result<Option<Self>, LockError> {
        let io_error = |source| LockError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
            Err(error) => return Err(io_error(error)),
        };
        let lock = Self {
            path: path.to_path_buf(),
        };
        writeln!(file, "{}", std::process::id()).map_err(io_error)?;
        Ok(Some(lock))
    }
}

impl Drop for ExportLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_owner(path: &Path) -> Owner {
    let Some(pid) = fs::read_to_string(path)
        .ok()
        .and_then(|text| text.trim().parse::<u32>().ok())
    else {
        return Owner::Unreadable;
    };

    let running = std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .is_ok_and(|status| status.success());
    if running {
        Owner::Running(pid)
    } else {
        Owner::Gone(pid)
    }
}
