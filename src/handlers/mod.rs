//! The handler registry.
//!
//! Each handler binds a maintenance action to the glob patterns whose
//! matches feed it. The registry is a flat, ordered list compiled into the
//! binary; the order encodes curated dependencies between handlers and is
//! never rearranged at runtime.

mod desktop;
mod kernel;
mod ldconfig;
mod misc;
mod systemd;

use crate::context::Context;
use crate::status::Status;
use crate::utils;
use std::path::Path;

/// Signature of a handler action: run configuration plus one matched path
/// in, outcome signals out.
pub type HandlerFn = fn(&mut Context, &Path) -> Status;

/// A registered maintenance action and the paths it cares about.
#[derive(Debug, Clone, Copy)]
pub struct Handler {
    /// Unique identifier, used for selective invocation and logging.
    pub name: &'static str,

    /// Human-readable purpose, shown by `systrig list`.
    pub description: &'static str,

    /// Executable the action spawns, if any. A handler whose executable is
    /// not installed cannot succeed and reports itself inert.
    pub required_bin: Option<&'static str>,

    /// Glob patterns, expanded in declared order.
    pub globs: &'static [&'static str],

    /// The action itself.
    pub action: HandlerFn,
}

impl Handler {
    /// Returns true if the handler's required executable (when it has one)
    /// is present and executable.
    #[must_use]
    pub fn available(&self) -> bool {
        self.required_bin
            .is_none_or(|bin| utils::is_executable(Path::new(bin)))
    }
}

/// All built-in handlers, in execution order.
///
/// Sequencing constraints live here, not in any dependency graph:
/// the library cache comes first so everything spawned afterwards resolves
/// fresh libraries; kernel module and hwdb indexes precede the systemd
/// block; systemd is reloaded before any userspace cache tools run under
/// it; the desktop caches are order-independent among themselves.
pub static REGISTRY: &[Handler] = &[
    // Library cache in order before anything else executes
    ldconfig::LDCONFIG,
    // Module dependency index after the library cache
    kernel::DEPMOD,
    // Hardware database before device-dependent consumers
    kernel::HWDB,
    // systemd block: users and tmpfiles before the manager is poked
    systemd::SYSUSERS,
    systemd::TMPFILES,
    systemd::DAEMON_RELOAD,
    systemd::DAEMON_REEXEC,
    // Userspace caches
    desktop::GIO_MODULES,
    desktop::FONTS,
    desktop::MIME,
    desktop::ICON_CACHE,
    desktop::DESKTOP_FILES,
    // Special cases
    misc::MANDB,
    misc::SSL_CERTS,
];

/// Looks up a handler by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Handler> {
    REGISTRY.iter().find(|h| h.name == name)
}

/// Precondition shared by most actions: the required executable exists and
/// is executable.
pub(crate) fn have_bin(bin: &str) -> bool {
    utils::is_executable(Path::new(bin))
}
