//! Desktop cache handlers: GIO modules, fonts, shared-mime, icon themes,
//! and desktop file indexes.

use super::{Handler, have_bin};
use crate::context::Context;
use crate::status::Status;
use crate::utils::{self, exec};
use std::path::Path;

const GIO_QUERYMODULES_BIN: &str = "/usr/bin/gio-querymodules";
const FC_CACHE_BIN: &str = "/usr/bin/fc-cache";
const UPDATE_MIME_BIN: &str = "/usr/bin/update-mime-database";
const GTK_ICON_CACHE_BIN: &str = "/usr/bin/gtk-update-icon-cache";
const UPDATE_DESKTOP_BIN: &str = "/usr/bin/update-desktop-database";

/// Cache GIO module metadata so gio does not have to dlopen every module.
pub const GIO_MODULES: Handler = Handler {
    name: "glib2-gio",
    description: "Create the glib2 GIO modules cache",
    required_bin: Some(GIO_QUERYMODULES_BIN),
    globs: &["/usr/lib64/gio/modules", "/usr/lib/gio/modules"],
    action: run_gio,
};

fn run_gio(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(GIO_QUERYMODULES_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }
    let Some(dir) = path.to_str() else {
        return Status::SKIP;
    };

    match exec::run_logged(GIO_QUERYMODULES_BIN, &[dir]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}

/// Rebuild fontconfig caches.
pub const FONTS: Handler = Handler {
    name: "fonts",
    description: "Rebuild fontconfig caches",
    required_bin: Some(FC_CACHE_BIN),
    globs: &["/usr/share/fonts"],
    action: run_fonts,
};

fn run_fonts(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(FC_CACHE_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }

    match exec::run_logged(FC_CACHE_BIN, &["-f"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}

/// Regenerate the shared MIME database.
pub const MIME: Handler = Handler {
    name: "mime",
    description: "Update the shared MIME database",
    required_bin: Some(UPDATE_MIME_BIN),
    globs: &["/usr/share/mime/packages"],
    action: run_mime,
};

fn run_mime(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(UPDATE_MIME_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }

    match exec::run_logged(UPDATE_MIME_BIN, &["/usr/share/mime"]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}

/// Refresh icon theme caches. Genuinely per-path: each theme directory
/// gets its own cache, so no BREAK here.
pub const ICON_CACHE: Handler = Handler {
    name: "icon-cache",
    description: "Refresh icon theme caches",
    required_bin: Some(GTK_ICON_CACHE_BIN),
    globs: &["/usr/share/icons/*"],
    action: run_icon_cache,
};

fn run_icon_cache(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(GTK_ICON_CACHE_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }
    // Only real themes carry an index; skip bare icon dumps.
    if !path.join("index.theme").exists() {
        return Status::SKIP;
    }
    let Some(dir) = path.to_str() else {
        return Status::SKIP;
    };

    match exec::run_logged(GTK_ICON_CACHE_BIN, &["-ftq", dir]) {
        Ok(true) => Status::SUCCESS,
        _ => Status::FAIL,
    }
}

/// Rebuild the desktop file MIME-association index.
pub const DESKTOP_FILES: Handler = Handler {
    name: "desktop-files",
    description: "Update the desktop file database",
    required_bin: Some(UPDATE_DESKTOP_BIN),
    globs: &["/usr/share/applications"],
    action: run_desktop_files,
};

fn run_desktop_files(_ctx: &mut Context, path: &Path) -> Status {
    if !have_bin(UPDATE_DESKTOP_BIN) {
        return Status::SKIP | Status::BREAK | Status::DROP;
    }
    if !utils::is_dir(path) {
        return Status::SKIP;
    }
    let Some(dir) = path.to_str() else {
        return Status::SKIP;
    };

    match exec::run_logged(UPDATE_DESKTOP_BIN, &["-q", dir]) {
        Ok(true) => Status::SUCCESS | Status::BREAK,
        _ => Status::FAIL | Status::BREAK,
    }
}
