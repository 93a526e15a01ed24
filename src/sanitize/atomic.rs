// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Atomic file replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::SanitizeError;

/// Replaces `path` with `contents` so readers never see a partial file.
///
/// The new content goes to a temporary file in the same directory, which then
/// takes over the original's permissions and is renamed over it. If anything
/// fails before the rename the temporary file is deleted and `path` is
/// untouched. A symlink is resolved first, so its target is replaced and
/// the link is kept.
///
/// # Errors
///
/// Returns `SanitizeError::Io` if the original cannot be inspected or the
/// temporary file cannot be written or renamed.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), SanitizeError> {
    let is_link = fs::symlink_metadata(path)
        .map_err(|e| SanitizeError::io(path, e))?
        .file_type()
        .is_symlink();
    let resolved = if is_link {
        fs::canonicalize(path).map_err(|e| SanitizeError::io(path, e))?
    } else {
        path.to_path_buf()
    };
    let path = resolved.as_path();

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let permissions = fs::metadata(path)
        .map_err(|e| SanitizeError::io(path, e))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| SanitizeError::io(parent, e))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| SanitizeError::io(tmp.path(), e))?;
    fs::set_permissions(tmp.path(), permissions).map_err(|e| SanitizeError::io(tmp.path(), e))?;

    tmp.persist(path)
        .map_err(|e| SanitizeError::io(path, e.error))?;
    Ok(())
}
