//! Per-run configuration shared with handler actions.
//!
//! A [`Context`] is owned by exactly one run. The environment flags are
//! detected once at construction and never change; the skip set is the only
//! part handlers may mutate while the run is in progress.

use std::collections::HashSet;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use tracing::debug;

/// Environment conditions a handler may need to honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// The process root differs from the init process root.
    Chrooted,
    /// Booted from a live medium.
    LiveMedium,
    /// Running inside a container.
    Container,
}

/// Environment flags, detected once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvFlags {
    /// Running inside a chroot.
    pub chrooted: bool,
    /// Running from a live medium.
    pub live_medium: bool,
    /// Running inside a container.
    pub container: bool,
}

impl EnvFlags {
    /// Probes the running system for all flags.
    #[must_use]
    pub fn detect() -> Self {
        let flags = Self {
            chrooted: is_chrooted(),
            live_medium: Path::new("/run/initramfs/livedev").exists(),
            container: in_container(),
        };
        debug!(?flags, "environment detected");
        flags
    }
}

/// Compares the device and inode of `/` against the init process root. If
/// init's root is not even visible, assume the worst and report a chroot.
fn is_chrooted() -> bool {
    let Ok(own_root) = std::fs::metadata("/") else {
        return true;
    };
    let Ok(init_root) = std::fs::metadata("/proc/1/root") else {
        return true;
    };
    own_root.dev() != init_root.dev() || own_root.ino() != init_root.ino()
}

/// Checks the markers systemd and docker leave behind for containers.
fn in_container() -> bool {
    Path::new("/run/systemd/container").exists() || Path::new("/.dockerenv").exists()
}

/// Process-wide run configuration handed to every handler action.
#[derive(Debug, Clone)]
pub struct Context {
    flags: EnvFlags,
    skip: HashSet<String>,
}

impl Context {
    /// Creates a context for the running system, detecting environment
    /// flags once.
    #[must_use]
    pub fn new() -> Self {
        Self::with_flags(EnvFlags::detect())
    }

    /// Creates a context with synthetic flags. Test harnesses use this to
    /// exercise handlers without depending on the host environment.
    #[must_use]
    pub fn with_flags(flags: EnvFlags) -> Self {
        Self {
            flags,
            skip: HashSet::new(),
        }
    }

    /// Returns whether the given environment flag was detected.
    #[must_use]
    pub fn has_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Chrooted => self.flags.chrooted,
            Flag::LiveMedium => self.flags.live_medium,
            Flag::Container => self.flags.container,
        }
    }

    /// Returns true if any sandbox-like condition holds. Handlers whose
    /// side effects only make sense on a booted host check this.
    #[must_use]
    pub fn sandboxed(&self) -> bool {
        self.flags.chrooted || self.flags.live_medium || self.flags.container
    }

    /// Marks an opaque key as skipped for the remainder of this run.
    pub fn push_skip(&mut self, key: impl Into<String>) {
        self.skip.insert(key.into());
    }

    /// Returns true if a handler or caller marked `key` to be skipped.
    /// Presence of the key is the signal; there is no associated value.
    #[must_use]
    pub fn should_skip(&self, key: &str) -> bool {
        self.skip.contains(key)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
