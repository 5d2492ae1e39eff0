//! Path fingerprinting.
//!
//! A fingerprint is a 128-bit xxHash3 summary of a path's current on-disk
//! state, rendered as 32 hex characters. Regular files hash their contents;
//! directories hash their recursive entry listing (name, size, mtime), so a
//! package dropping or replacing a file anywhere below a tracked directory
//! changes the directory's fingerprint. The computation depends only on
//! what is on disk at the moment of the call.

use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::File;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use walkdir::WalkDir;
use xxhash_rust::xxh3::{Xxh3, xxh3_128};

/// Files below this size are read whole; larger ones are mapped.
const MMAP_THRESHOLD: u64 = 1_048_576;

/// Computes the fingerprint for `path`.
///
/// # Errors
///
/// Returns an error if the path cannot be stat'd or read. Callers treat a
/// fingerprint failure as "needs reprocessing".
pub fn fingerprint(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;

    if metadata.is_dir() {
        return fingerprint_dir(path);
    }
    if metadata.is_file() {
        return fingerprint_file(path, metadata.len());
    }

    // Sockets, fifos, device nodes: summarize the inode metadata.
    let mut hasher = Xxh3::new();
    hasher.update(&metadata.mode().to_le_bytes());
    hasher.update(&metadata.size().to_le_bytes());
    hasher.update(&metadata.mtime().to_le_bytes());
    hasher.update(&metadata.mtime_nsec().to_le_bytes());
    Ok(format!("{:032x}", hasher.digest128()))
}

/// Hashes a regular file's contents, mapping large files instead of
/// reading them into memory.
fn fingerprint_file(path: &Path, len: u64) -> Result<String> {
    if len == 0 {
        return Ok(format!("{:032x}", xxh3_128(b"")));
    }

    if len < MMAP_THRESHOLD {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(format!("{:032x}", xxh3_128(&content)))
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(format!("{:032x}", xxh3_128(&mmap)))
    }
}

/// Hashes the sorted recursive listing of a directory. Entry contents are
/// not read; name, size, and mtime are enough to notice package-manager
/// writes without the cost of hashing every font or module archive.
fn fingerprint_dir(path: &Path) -> Result<String> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(path).min_depth(1).follow_links(false) {
        // A child vanishing mid-walk is fine; the next run re-fingerprints.
        let Ok(entry) = entry else { continue };
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        entries.push((
            entry.path().to_path_buf(),
            metadata.size(),
            metadata.mtime(),
            metadata.mtime_nsec(),
        ));
    }

    entries.sort();

    let mut hasher = Xxh3::new();
    for (entry_path, size, mtime, mtime_nsec) in &entries {
        hasher.update(entry_path.as_os_str().as_encoded_bytes());
        hasher.update(&size.to_le_bytes());
        hasher.update(&mtime.to_le_bytes());
        hasher.update(&mtime_nsec.to_le_bytes());
    }
    Ok(format!("{:032x}", hasher.digest128()))
}
