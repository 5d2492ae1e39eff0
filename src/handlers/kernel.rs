//! Kernel-adjacent handlers: module dependency index and the udev
//! hardware database.

use super::{Handler, have_bin};
use crate::context::Context;
use crate::status::Status;
use crate::utils::{self, exec};
use std::path::Path;

const DEPMOD_BIN: &str = "/sbin/depmod";
const HWDB_BIN: &str = "/usr/bin/systemd-hwdb";

/// Regenerate `modules.dep` for each installed kernel whose module tree
/// changed. Genuinely per-path: one depmod invocation per kernel version.
pub const DEPMOD: Handler = Handler {
    name: "depmod",
    description: "Rebuild kernel module dependency maps",
    required_bin: Some(DEPMOD_BIN),
    globs: &["/usr/lib/modules/*"],
    action: run_depmod,
};

fn run_depmod(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(DEPMOD_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }
    // The glob matches /usr/lib/modules/<version>
    let Some(version) = path.file_name().and_then(|n| n.to_str()) else {
        return Status::SKIP;
    };

    match exec::run_logged(DEPMOD_BIN, &["-a", version]) {
        Ok(true) => Status::SUCCESS,
        _ => Status::FAIL,
    }
}

/// Recompile the udev hardware database when its fragments change.
pub const HWDB: Handler = Handler {
    name: "hwdb",
    description: "Update the udev hardware database",
    required_bin: Some(HWDB_BIN),
    globs: &["/usr/lib/udev/hwdb.d"],
    action: run_hwdb,
};

fn run_hwdb(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(HWDB_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }

    match exec::run_logged(HWDB_BIN, &["update"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}
