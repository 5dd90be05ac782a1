//! # Data Directory Locking
//!
//! Two service instances sharing a data directory would interleave writes to
//! `operator.json`. The first to start takes an exclusive `flock` (via `fs2`)
//! on `<data_dir>/LOCK` and records its PID there; the second fails fast.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::domain::StoreError;

const LOCK_FILE_NAME: &str = "LOCK";

#[derive(Debug, Error)]
pub enum LockError {
    #[error("cannot open lock file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("data directory in use by process {holder} ({})", .path.display())]
    HeldBy { holder: u32, path: PathBuf },

    /// Held, but the holder's PID could not be read.
    #[error("data directory in use ({})", .path.display())]
    Held { path: PathBuf },

    #[error("cannot record PID in lock file: {0}")]
    RecordPid(#[source] io::Error),
}

impl From<LockError> for StoreError {
    fn from(err: LockError) -> Self {
        StoreError::Locked {
            reason: err.to_string(),
        }
    }
}

/// Exclusive hold on a data directory. Dropping it releases the `flock`
/// and removes the lock file.
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
    owner: u32,
}

impl DataDirLock {
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        let path = dir.join(LOCK_FILE_NAME);

        // The current holder's PID must survive a failed attempt: open
        // without truncating and only rewrite once the lock is ours.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        if file.try_lock_exclusive().is_err() {
            return Err(match holder_pid(&path) {
                Some(holder) => LockError::HeldBy { holder, path },
                None => LockError::Held { path },
            });
        }

        let owner = std::process::id();
        file.set_len(0)
            .and_then(|()| writeln!(file, "{}", owner))
            .and_then(|()| file.sync_all())
            .map_err(LockError::RecordPid)?;

        Ok(Self { file, path, owner })
    }

    /// PID written into the lock file.
    pub fn owner(&self) -> u32 {
        self.owner
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn holder_pid(path: &Path) -> Option<u32> {
    let content = fs::read_to_string(path).ok()?;
    content.trim().parse().ok()
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}
