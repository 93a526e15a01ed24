// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations.
//!
//! ```text
//! query.rs --> GixBackend   --> .git/ (no subprocess)
//!          --> ShellBackend --> git ls-remote (network)
//! ```

use crate::error::ReleaseResult;
use std::path::Path;

use super::backend::{GitQuery, GixBackend, ShellBackend};

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or head resolution fails.
pub fn current_branch(path: &Path) -> ReleaseResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// Full hex id of HEAD.
///
/// # Errors
///
/// Returns a `GitError` if the repository has no commits.
pub fn head_hash(path: &Path) -> ReleaseResult<String> {
    GixBackend::head_hash(path)
}

/// Check for uncommitted changes (staged, unstaged, or untracked files).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or status check fails.
pub fn has_uncommitted_changes(path: &Path) -> ReleaseResult<bool> {
    GixBackend::has_uncommitted_changes(path)
}

/// Check whether `branch` exists on `remote` without fetching.
///
/// # Errors
///
/// Returns a `GitError` if the remote cannot be queried.
pub fn remote_branch_exists(repo_path: &Path, remote: &str, branch: &str) -> ReleaseResult<bool> {
    ShellBackend::remote_branch_exists(repo_path, remote, branch)
}
