//! Dynamic linker cache handler.

use super::{Handler, have_bin};
use crate::context::Context;
use crate::status::Status;
use crate::utils::exec;
use std::path::Path;

const LDCONFIG_BIN: &str = "/sbin/ldconfig";

/// Rebuild `ld.so.cache` once when any shared library changed.
pub const LDCONFIG: Handler = Handler {
    name: "ldconfig",
    description: "Update the dynamic linker cache",
    required_bin: Some(LDCONFIG_BIN),
    globs: &[
        "/usr/lib64/lib*.so*",
        "/usr/lib/lib*.so*",
        "/usr/local/lib/lib*.so*",
    ],
    action: run,
};

fn run(_ctx: &mut Context, _path: &Path) -> Status {
    if !have_bin(LDCONFIG_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }

    match exec::run_logged(LDCONFIG_BIN, &[]) {
        // One rebuild covers every library matched by this pattern.
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}
