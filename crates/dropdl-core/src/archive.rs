//! De-duplication ledger (archive.txt) and the per-config-dir run lock.
//!
//! The archive itself belongs to yt-dlp (one downloaded-item identifier per
//! line, consumed and appended via `--download-archive`); dropdl only reads
//! it for status reporting. Because two concurrent runs appending to the same
//! archive would corrupt the ledger, a run takes an exclusive advisory lock
//! on a lock file in the config directory first.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LOCK_FILE: &str = ".dropdl.lock";

/// Failure to take the per-config-dir run lock.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("another dropdl run is already active for {}", .path.display())]
    AlreadyLocked { path: PathBuf },
    #[error("lock file: {0}")]
    Io(#[from] std::io::Error),
}

/// Number of archive entries (non-empty lines), or None when the archive
/// does not exist yet.
pub fn entry_count(path: &Path) -> Result<Option<u64>> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(Some(
            data.lines().filter(|l| !l.trim().is_empty()).count() as u64
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read archive: {}", path.display())),
    }
}

/// Exclusive advisory lock held for the duration of a run that touches the
/// manifest or the archive. Released when dropped (or when the process dies,
/// so a crashed run never wedges the next one).
pub struct RunLock {
    _file: File,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock for the given config directory, failing fast when
    /// another process already holds it.
    pub fn acquire(config_dir: &Path) -> Result<RunLock, LockError> {
        let path = config_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)?;
        match try_lock_exclusive(&file) {
            Ok(()) => {
                tracing::debug!("run lock acquired at {}", path.display());
                Ok(RunLock { _file: file, path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked {
                    path: config_dir.to_path_buf(),
                })
            }
            Err(e) => Err(LockError::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

// Advisory locking is unix-only; elsewhere concurrent-run discipline is on
// the operator (documented as unsupported).
#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}
