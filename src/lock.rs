//! Run locking to prevent concurrent trigger runs.
//!
//! Two package transactions finishing at the same time must not interleave
//! their state writes. The engine takes an exclusive advisory lock on a
//! file in the state directory for the duration of a run; the lock is
//! released when dropped.

use anyhow::{Context, Result, bail};
use fs4::fs_std::FileExt;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, Instant};

/// Holds the exclusive run lock. Dropping it releases the lock.
#[derive(Debug)]
pub struct RunLock {
    lock_file: File,
}

impl RunLock {
    /// Acquires the run lock inside `state_dir`, waiting briefly for a
    /// concurrent run to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created or another
    /// run still holds the lock after the timeout.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        fs::create_dir_all(state_dir)
            .with_context(|| format!("Failed to create state directory {}", state_dir.display()))?;

        let lock_path = state_dir.join("lock");
        let lock_file = File::create(&lock_path)
            .with_context(|| format!("Failed to create lock file {}", lock_path.display()))?;

        let timeout = if cfg!(test) {
            Duration::from_millis(100)
        } else {
            Duration::from_secs(30)
        };
        let retry = Duration::from_millis(100);
        let start = Instant::now();

        loop {
            match lock_file.try_lock_exclusive() {
                Ok(true) => return Ok(Self { lock_file }),
                Ok(false) => {}
                Err(e) => return Err(e).context("Failed to acquire run lock"),
            }
            if start.elapsed() >= timeout {
                bail!("Another trigger run is in progress (lock held on {})", lock_path.display());
            }
            std::thread::sleep(retry);
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.lock_file);
    }
}
