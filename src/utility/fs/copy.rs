// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::Context;
use tokio::fs;

use crate::error::Result;

/// Recursively copies `src` to `dst`, creating `dst` if needed.
///
/// Symlinks are recreated as symlinks rather than followed, so a copied
/// `.git` directory stays byte-for-byte equivalent.
///
/// # Errors
///
/// Returns an error if any directory cannot be read or created, or any file
/// cannot be copied.
pub async fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .await
        .with_context(|| format!("failed to create directory {}", dst.display()))?;

    let mut entries = fs::read_dir(src)
        .await
        .with_context(|| format!("failed to read directory {}", src.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("failed to read entry from {}", src.display()))?
    {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("failed to stat {}", src_path.display()))?;

        if file_type.is_dir() {
            Box::pin(copy_dir_all(&src_path, &dst_path)).await?;
        } else if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path).await?;
        } else {
            fs::copy(&src_path, &dst_path).await.with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Replaces `dst` with a recursive copy of `src`.
///
/// # Errors
///
/// Returns an error if the old `dst` cannot be removed or the copy fails.
pub async fn replace_dir(src: &Path, dst: &Path) -> Result<()> {
    match fs::remove_dir_all(dst).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("failed to remove {}", dst.display()));
        }
    }
    copy_dir_all(src, dst).await
}

#[cfg(unix)]
async fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)
        .await
        .with_context(|| format!("failed to read link {}", src.display()))?;
    fs::symlink(&target, dst)
        .await
        .with_context(|| format!("failed to create link {}", dst.display()))
}

#[cfg(not(unix))]
async fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)
        .await
        .map(|_| ())
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))
}
