// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Output writing. Artifacts are staged in sibling temporary files and renamed into place, so
//! a failed conversion never leaves a partially written output behind.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn staging_path(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

fn backup_path(path: &Path) -> PathBuf {
    sibling_path(path, ".bak")
}

/// A destination that has already received its new content
struct Committed<'a> {
    path: &'a Path,
    backup: Option<PathBuf>,
}

/// Writes `bytes` to `path` through a temporary file
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    write_all_or_nothing(&[(path, bytes)])
}

/// Writes several artifacts: all of them are staged before any is renamed into place.
///
/// Existing destination files are moved aside first. If any rename fails, destinations that
/// were already replaced are removed and their previous content is restored, so either every
/// artifact is written or the destinations are left as they were. Temporary files are removed
/// on failure.
pub fn write_all_or_nothing(artifacts: &[(&Path, &[u8])]) -> io::Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(artifacts.len());
    for &(path, bytes) in artifacts {
        let temporary = staging_path(path);
        if let Err(error) = fs::write(&temporary, bytes) {
            let _ = fs::remove_file(&temporary);
            discard(&staged);
            return Err(error);
        }
        staged.push((temporary, path));
    }

    let mut committed: Vec<Committed<'_>> = Vec::with_capacity(staged.len());
    for (index, (temporary, path)) in staged.iter().enumerate() {
        let backup = if path.is_file() {
            let backup = backup_path(path);
            if let Err(error) = fs::rename(path, &backup) {
                roll_back(&committed);
                discard(&staged[index..]);
                return Err(error);
            }
            Some(backup)
        } else {
            None
        };

        if let Err(error) = fs::rename(temporary, path) {
            if let Some(backup) = &backup {
                let _ = fs::rename(backup, path);
            }
            roll_back(&committed);
            discard(&staged[index..]);
            return Err(error);
        }
        committed.push(Committed { path, backup });
    }

    for backup in committed.iter().filter_map(|c| c.backup.as_ref()) {
        let _ = fs::remove_file(backup);
    }
    Ok(())
}

fn roll_back(committed: &[Committed<'_>]) {
    for entry in committed.iter().rev() {
        let _ = fs::remove_file(entry.path);
        if let Some(backup) = &entry.backup {
            let _ = fs::rename(backup, entry.path);
        }
    }
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (temporary, _) in staged {
        let _ = fs::remove_file(temporary);
    }
}
