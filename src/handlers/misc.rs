//! Special-case handlers: man page index and SSL certificate hashes.

use super::{Handler, have_bin};
use crate::context::Context;
use crate::status::Status;
use crate::utils::{self, exec};
use std::path::Path;

const MANDB_BIN: &str = "/usr/bin/mandb";
const OPENSSL_BIN: &str = "/usr/bin/openssl";

/// Rebuild the man page index.
///
/// mandb maintains its own freshness tracking under /var/cache/man, so the
/// path is deliberately never recorded (DROP): mandb decides what is
/// stale, we only decide when to poke it.
pub const MANDB: Handler = Handler {
    name: "mandb",
    description: "Update the manual page index cache",
    required_bin: Some(MANDB_BIN),
    globs: &["/usr/share/man"],
    action: run_mandb,
};

fn run_mandb(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(MANDB_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }

    match exec::run_logged(MANDB_BIN, &["--quiet"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK | Status::DROP,
        _ => Status::FAIL | Status::BREAK,
    }
}

/// Rehash the system certificate store.
pub const SSL_CERTS: Handler = Handler {
    name: "ssl-certs",
    description: "Rehash the SSL certificate store",
    required_bin: Some(OPENSSL_BIN),
    globs: &["/etc/ssl/certs"],
    action: run_ssl_certs,
};

fn run_ssl_certs(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(OPENSSL_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }
    let Some(dir) = path.to_str() else {
        return Status::SKIP;
    };

    match exec::run_logged(OPENSSL_BIN, &["rehash", dir]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}
