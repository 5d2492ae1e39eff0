//! Persistent record of processed paths.
//!
//! The tracker keeps two maps: the fingerprints loaded from the previous
//! run, and the fingerprints confirmed during the current run. Only the
//! current map is written back, atomically replacing the old file. A path
//! that stops matching any handler's globs never re-enters the current
//! map and is garbage collected for free.

use crate::utils::hash;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Bumped when the on-disk encoding changes; a mismatch is treated like a
/// corrupt file.
const STATE_VERSION: u32 = 1;

/// Serialized form of the tracker.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    entries: HashMap<PathBuf, String>,
}

/// Get the bincode configuration
fn bincode_config() -> impl bincode::config::Config {
    // Limit allocation to keep a corrupt state file from exhausting memory
    bincode::config::legacy().with_limit::<{ 16 * 1024 * 1024 }>()
}

/// Tracks which paths have already been processed, across runs.
#[derive(Debug)]
pub struct StateTracker {
    path: PathBuf,
    prev: HashMap<PathBuf, String>,
    next: HashMap<PathBuf, String>,
}

impl StateTracker {
    /// Creates a tracker backed by the state file at `path`. Nothing is
    /// read until [`load`](Self::load) is called.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            prev: HashMap::new(),
            next: HashMap::new(),
        }
    }

    /// Reads the previous run's fingerprints.
    ///
    /// A missing file is normal (first run) and succeeds with empty state.
    ///
    /// # Errors
    ///
    /// Returns an error for an unreadable, corrupt, or version-mismatched
    /// file. Callers log it and proceed with empty state; it is never
    /// fatal to a run.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let data = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;

        let (state, _): (StateFile, usize) =
            bincode::serde::decode_from_slice(&data, bincode_config())
                .context("Failed to decode state file")?;

        if state.version != STATE_VERSION {
            bail!(
                "State file version {} is not {STATE_VERSION}",
                state.version
            );
        }

        debug!(entries = state.entries.len(), "state loaded");
        self.prev = state.entries;
        Ok(())
    }

    /// Decides whether `path` must be reprocessed.
    ///
    /// Returns true when no fingerprint is on record or the recorded one no
    /// longer matches the path's on-disk state. When the recorded
    /// fingerprint is still valid the entry is carried over into the
    /// current run's map, so an unchanged path survives the end-of-run
    /// rewrite.
    pub fn needs_update(&mut self, path: &Path) -> bool {
        let Ok(current) = hash::fingerprint(path) else {
            // Unreadable now; let the handler decide what to do with it.
            return true;
        };

        match self.prev.get(path) {
            Some(recorded) if *recorded == current => {
                self.next.insert(path.to_path_buf(), current);
                false
            }
            _ => true,
        }
    }

    /// Records the current fingerprint for `path` in this run's map.
    ///
    /// # Errors
    ///
    /// Returns an error if the fingerprint cannot be computed. The engine
    /// logs this and carries on; the path will simply be reprocessed next
    /// run.
    pub fn push_path(&mut self, path: &Path) -> Result<()> {
        let fingerprint = hash::fingerprint(path)?;
        self.next.insert(path.to_path_buf(), fingerprint);
        Ok(())
    }

    /// Returns true if `path` has been recorded during this run.
    #[must_use]
    pub fn is_recorded(&self, path: &Path) -> bool {
        self.next.contains_key(path)
    }

    /// Atomically replaces the state file with this run's fingerprints.
    ///
    /// The new content is written to a temporary file in the same directory
    /// and renamed over the old one, so a crash mid-write leaves the
    /// previous state intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created or the
    /// file cannot be written and persisted.
    pub fn write(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("State file path has no parent directory")?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory {}", dir.display()))?;

        let state = StateFile {
            version: STATE_VERSION,
            entries: self.next.clone(),
        };
        let data = bincode::serde::encode_to_vec(&state, bincode_config())
            .context("Failed to encode state")?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        std::io::Write::write_all(&mut tmp, &data).context("Failed to write state")?;
        tmp.as_file().sync_all().context("Failed to sync state")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;

        debug!(entries = self.next.len(), "state written");
        Ok(())
    }
}
