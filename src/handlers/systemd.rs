//! systemd handlers: sysusers, tmpfiles, daemon reload and reexec.
//!
//! Reload and reexec only make sense against a booted manager, so both
//! bail out in sandboxed environments. A failed reload also vetoes the
//! reexec for the rest of the run via the context skip set; re-executing a
//! manager that could not even reload its units would make things worse.

use super::{Handler, have_bin};
use crate::context::Context;
use crate::status::Status;
use crate::utils::{self, exec};
use std::path::Path;

const SYSUSERS_BIN: &str = "/usr/bin/systemd-sysusers";
const TMPFILES_BIN: &str = "/usr/bin/systemd-tmpfiles";
const SYSTEMCTL_BIN: &str = "/usr/bin/systemctl";

/// Skip-set key: set when daemon-reload failed, checked by daemon-reexec.
const SKIP_REEXEC: &str = "systemd-reexec";

/// Create system users and groups declared by packages.
pub const SYSUSERS: Handler = Handler {
    name: "sysusers",
    description: "Create declared system users and groups",
    required_bin: Some(SYSUSERS_BIN),
    globs: &["/usr/lib/sysusers.d/*.conf"],
    action: run_sysusers,
};

fn run_sysusers(_ctx: &mut Context, _path: &Path) -> Status {
    if !have_bin(SYSUSERS_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }

    match exec::run_logged(SYSUSERS_BIN, &[]) {
        // One invocation processes every fragment.
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}

/// Apply packaged tmpfiles.d entries.
pub const TMPFILES: Handler = Handler {
    name: "tmpfiles",
    description: "Create and clean declared volatile files",
    required_bin: Some(TMPFILES_BIN),
    globs: &["/usr/lib/tmpfiles.d/*.conf"],
    action: run_tmpfiles,
};

fn run_tmpfiles(ctx: &mut Context, _path: &Path) -> Status {
    if !have_bin(TMPFILES_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    // Volatile paths belong to the booted system, not to an image being
    // assembled; first boot runs systemd-tmpfiles itself.
    if ctx.sandboxed() {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }

    match exec::run_logged(TMPFILES_BIN, &["--create"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}

/// Reload systemd unit definitions once when any packaged unit changed.
pub const DAEMON_RELOAD: Handler = Handler {
    name: "systemd-reload",
    description: "Reload systemd unit definitions",
    required_bin: Some(SYSTEMCTL_BIN),
    globs: &[
        "/usr/lib/systemd/system/*",
        "/usr/lib/systemd/user/*",
    ],
    action: run_daemon_reload,
};

fn run_daemon_reload(ctx: &mut Context, _path: &Path) -> Status {
    if !have_bin(SYSTEMCTL_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if ctx.sandboxed() {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }

    match exec::run_logged(SYSTEMCTL_BIN, &["daemon-reload"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => {
            ctx.push_skip(SKIP_REEXEC);
            Status::FAIL | Status::BREAK
        }
    }
}

/// Ask systemd to re-execute itself when its binary was updated.
pub const DAEMON_REEXEC: Handler = Handler {
    name: "systemd-reexec",
    description: "Re-execute the systemd manager",
    required_bin: Some(SYSTEMCTL_BIN),
    globs: &["/usr/lib/systemd/systemd"],
    action: run_daemon_reexec,
};

fn run_daemon_reexec(ctx: &mut Context, path: &Path) -> Status {
    if !utils::is_executable(path) || !have_bin(SYSTEMCTL_BIN) {
        return Status::SKIP;
    }
    if ctx.sandboxed() || ctx.should_skip(SKIP_REEXEC) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }

    match exec::run_logged(SYSTEMCTL_BIN, &["daemon-reexec"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}
