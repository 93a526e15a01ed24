// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (hooks, credentials, submodules)
//! ```

use crate::error::ReleaseResult;
use std::path::Path;

use super::backend::{GitMutation, ShellBackend};

/// Checkout a branch, tag, or commit.
///
/// # Errors
///
/// Returns a `GitError` if the checkout fails.
pub fn checkout(repo_path: &Path, what: &str) -> ReleaseResult<()> {
    ShellBackend::checkout(repo_path, what)
}

/// Create `branch` at `start_point` and switch to it.
///
/// # Errors
///
/// Returns a `GitError` if the branch exists or `start_point` is unknown.
pub fn create_branch_at(repo_path: &Path, branch: &str, start_point: &str) -> ReleaseResult<()> {
    ShellBackend::create_branch_at(repo_path, branch, start_point)
}

/// Pull the current branch from its upstream.
///
/// # Errors
///
/// Returns a `GitError` if the pull fails.
pub fn pull(repo_path: &Path) -> ReleaseResult<()> {
    ShellBackend::pull(repo_path)
}

/// Pull `branch` from `remote`.
///
/// # Errors
///
/// Returns a `GitError` if the pull fails.
pub fn pull_from(repo_path: &Path, remote: &str, branch: &str) -> ReleaseResult<()> {
    ShellBackend::pull_from(repo_path, remote, branch)
}

/// Commit all tracked changes.
///
/// # Errors
///
/// Returns a `GitError` if there is nothing to commit (and `allow_empty` is
/// false) or the commit fails.
pub fn commit_all(repo_path: &Path, message: &str, allow_empty: bool) -> ReleaseResult<()> {
    ShellBackend::commit_all(repo_path, message, allow_empty)
}

/// Stage every change, including untracked and deleted files.
///
/// # Errors
///
/// Returns a `GitError` if staging fails.
pub fn add_all(repo_path: &Path) -> ReleaseResult<()> {
    ShellBackend::add_all(repo_path)
}

/// Create an annotated tag on HEAD.
///
/// # Errors
///
/// Returns a `GitError` if the tag exists and `force` is false.
pub fn tag_annotated(repo_path: &Path, name: &str, message: &str, force: bool) -> ReleaseResult<()> {
    ShellBackend::tag_annotated(repo_path, name, message, force)
}

/// Push a refspec to a remote.
///
/// # Errors
///
/// Returns a `GitError` if the push is rejected.
pub fn push(repo_path: &Path, remote: &str, refspec: &str, force: bool) -> ReleaseResult<()> {
    ShellBackend::push(repo_path, remote, refspec, force)
}

/// Cherry-pick `rev` with `-x --allow-empty`.
///
/// # Errors
///
/// Returns a `GitError` on conflicts.
pub fn cherry_pick(repo_path: &Path, rev: &str) -> ReleaseResult<()> {
    ShellBackend::cherry_pick(repo_path, rev)
}

/// Merge `branch` into the current branch.
///
/// # Errors
///
/// Returns a `GitError` on conflicts.
pub fn merge(repo_path: &Path, branch: &str) -> ReleaseResult<()> {
    ShellBackend::merge(repo_path, branch)
}

/// `git submodule init`.
///
/// # Errors
///
/// Returns a `GitError` if the command fails.
pub fn submodule_init(repo_path: &Path) -> ReleaseResult<()> {
    ShellBackend::submodule_init(repo_path)
}

/// `git submodule update --recursive`.
///
/// # Errors
///
/// Returns a `GitError` if a submodule cannot be checked out.
pub fn submodule_update_recursive(repo_path: &Path) -> ReleaseResult<()> {
    ShellBackend::submodule_update_recursive(repo_path)
}

/// `git rm -f <path>`.
///
/// # Errors
///
/// Returns a `GitError` if the path is not tracked.
pub fn remove(repo_path: &Path, path: &str) -> ReleaseResult<()> {
    ShellBackend::remove(repo_path, path)
}

/// `git checkout .`
///
/// # Errors
///
/// Returns a `GitError` if the command fails.
pub fn discard_changes(repo_path: &Path) -> ReleaseResult<()> {
    ShellBackend::discard_changes(repo_path)
}

/// `git clean -df`
///
/// # Errors
///
/// Returns a `GitError` if the command fails.
pub fn clean_untracked(repo_path: &Path) -> ReleaseResult<()> {
    ShellBackend::clean_untracked(repo_path)
}
