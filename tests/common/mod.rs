//! Shared fixtures for engine integration tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use systrig::handlers::{Handler, HandlerFn};
use tempfile::TempDir;

/// Per-path invocation counts, keyed by matched path. Tests operate in
/// their own temp directories, so counting "under this directory" keeps
/// parallel tests from seeing each other.
static CALLS: LazyLock<Mutex<HashMap<PathBuf, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Records one action invocation for `path`.
pub fn record_call(path: &Path) {
    *CALLS
        .lock()
        .unwrap()
        .entry(path.to_path_buf())
        .or_insert(0) += 1;
}

/// Action invocations for one exact path.
pub fn calls_for(path: &Path) -> usize {
    CALLS.lock().unwrap().get(path).copied().unwrap_or(0)
}

/// Total action invocations on paths below `dir`.
pub fn calls_under(dir: &Path) -> usize {
    CALLS
        .lock()
        .unwrap()
        .iter()
        .filter(|(path, _)| path.starts_with(dir))
        .map(|(_, count)| count)
        .sum()
}

/// A temp-dir sandbox: a watched directory for glob targets, plus state
/// and log locations for an [`systrig::engine::Engine`].
pub struct TriggerFixture {
    pub temp: TempDir,
    pub watched: PathBuf,
}

impl TriggerFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let watched = temp.path().join("watched");
        std::fs::create_dir(&watched).expect("Failed to create watched dir");
        Self { temp, watched }
    }

    pub fn state_path(&self) -> PathBuf {
        self.temp.path().join("state").join("state.bin")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.temp.path().join("log")
    }

    /// Creates (or rewrites) a file in the watched directory.
    pub fn touch(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.watched.join(name);
        std::fs::write(&path, content).expect("Failed to write watched file");
        path
    }

    /// A handler whose glob pattern covers the watched directory.
    /// Registry globs are `'static`, so test patterns are leaked.
    pub fn handler(&self, name: &'static str, pattern: &str, action: HandlerFn) -> Handler {
        let full = format!("{}/{pattern}", self.watched.display());
        let globs: Vec<&'static str> = vec![Box::leak(full.into_boxed_str())];
        Handler {
            name,
            description: "test handler",
            required_bin: None,
            globs: Box::leak(globs.into_boxed_slice()),
            action,
        }
    }

    /// A handler with several glob patterns under the watched directory.
    pub fn handler_multi(
        &self,
        name: &'static str,
        patterns: &[&str],
        action: HandlerFn,
    ) -> Handler {
        let globs: Vec<&'static str> = patterns
            .iter()
            .map(|pattern| {
                let full = format!("{}/{pattern}", self.watched.display());
                &*Box::leak(full.into_boxed_str())
            })
            .collect();
        Handler {
            name,
            description: "test handler",
            required_bin: None,
            globs: Box::leak(globs.into_boxed_slice()),
            action,
        }
    }
}
