// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository handle used by the release flows.
//!
//! Queries always run. Mutations are logged and skipped when the handle is in
//! dry-run mode, so a dry release walks every step against the real state.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{cmd, query};
use crate::error::{GitError, ReleaseResult, Result};
use crate::pipeline::StepContext;

/// A working tree plus the dry-run switch.
#[derive(Debug, Clone)]
pub struct Repo {
    path: PathBuf,
    dry_run: bool,
}

impl Repo {
    pub fn new(path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            path: path.into(),
            dry_run,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Handle for a directory inside this repository (e.g. a submodule).
    #[must_use]
    pub fn child(&self, relative: impl AsRef<Path>) -> Self {
        Self::new(self.path.join(relative), self.dry_run)
    }

    /// Runs `op` unless in dry-run mode, logging the equivalent git command.
    fn mutate(
        &self,
        description: &str,
        op: impl FnOnce(&Path) -> ReleaseResult<()>,
    ) -> ReleaseResult<()> {
        if self.dry_run {
            info!(repo = %self.path.display(), "dry run: git {description}");
            return Ok(());
        }
        info!(repo = %self.path.display(), "git {description}");
        op(&self.path)
    }

    // --- queries ---

    #[must_use]
    pub fn is_git_repo(&self) -> bool {
        query::is_git_repo(&self.path)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be resolved.
    pub fn current_branch(&self) -> ReleaseResult<Option<String>> {
        query::current_branch(&self.path)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the repository has no commits.
    pub fn head_hash(&self) -> ReleaseResult<String> {
        query::head_hash(&self.path)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the status cannot be computed.
    pub fn has_uncommitted_changes(&self) -> ReleaseResult<bool> {
        query::has_uncommitted_changes(&self.path)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be queried.
    pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> ReleaseResult<bool> {
        query::remote_branch_exists(&self.path, remote, branch)
    }

    /// Fails with `BranchExists` if `branch` is already on `remote`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::BranchExists`, or a `GitError` if the remote cannot
    /// be queried.
    pub fn ensure_branch_unpublished(&self, remote: &str, branch: &str) -> ReleaseResult<()> {
        if self.remote_branch_exists(remote, branch)? {
            return Err(GitError::BranchExists {
                branch: branch.to_string(),
                remote: remote.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // --- mutations ---

    /// # Errors
    ///
    /// Returns a `GitError` if the checkout fails.
    pub fn checkout(&self, what: &str) -> ReleaseResult<()> {
        self.mutate(&format!("checkout {what}"), |p| cmd::checkout(p, what))
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the branch cannot be created.
    pub fn create_branch_at(&self, branch: &str, start_point: &str) -> ReleaseResult<()> {
        self.mutate(&format!("checkout -b {branch} {start_point}"), |p| {
            cmd::create_branch_at(p, branch, start_point)
        })
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails.
    pub fn pull(&self) -> ReleaseResult<()> {
        self.mutate("pull", cmd::pull)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails.
    pub fn pull_from(&self, remote: &str, branch: &str) -> ReleaseResult<()> {
        self.mutate(&format!("pull {remote} {branch}"), |p| {
            cmd::pull_from(p, remote, branch)
        })
    }

    /// Commits all tracked changes and returns the new HEAD.
    ///
    /// In dry-run mode nothing is committed and the current HEAD is returned.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the commit fails.
    pub fn commit_all(&self, message: &str, allow_empty: bool) -> ReleaseResult<String> {
        let flag = if allow_empty { " --allow-empty" } else { "" };
        self.mutate(&format!("commit{flag} -am \"{message}\""), |p| {
            cmd::commit_all(p, message, allow_empty)
        })?;
        self.head_hash()
    }

    /// # Errors
    ///
    /// Returns a `GitError` if staging fails.
    pub fn add_all(&self) -> ReleaseResult<()> {
        self.mutate("add -A .", cmd::add_all)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the tag cannot be created.
    pub fn tag_annotated(&self, name: &str, message: &str, force: bool) -> ReleaseResult<()> {
        self.mutate(&format!("tag -a {name} -m \"{message}\""), |p| {
            cmd::tag_annotated(p, name, message, force)
        })
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the push is rejected.
    pub fn push(&self, remote: &str, refspec: &str, force: bool) -> ReleaseResult<()> {
        let flag = if force { " --force" } else { "" };
        self.mutate(&format!("push{flag} {remote} {refspec}"), |p| {
            cmd::push(p, remote, refspec, force)
        })
    }

    /// # Errors
    ///
    /// Returns a `GitError` on conflicts.
    pub fn cherry_pick(&self, rev: &str) -> ReleaseResult<()> {
        self.mutate(&format!("cherry-pick -x --allow-empty {rev}"), |p| {
            cmd::cherry_pick(p, rev)
        })
    }

    /// # Errors
    ///
    /// Returns a `GitError` on conflicts.
    pub fn merge(&self, branch: &str) -> ReleaseResult<()> {
        self.mutate(&format!("merge --no-edit {branch}"), |p| cmd::merge(p, branch))
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    pub fn submodule_init(&self) -> ReleaseResult<()> {
        self.mutate("submodule init", cmd::submodule_init)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    pub fn submodule_update_recursive(&self) -> ReleaseResult<()> {
        self.mutate("submodule update --recursive", cmd::submodule_update_recursive)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the path is not tracked.
    pub fn remove(&self, path: &str) -> ReleaseResult<()> {
        self.mutate(&format!("rm -f {path}"), |p| cmd::remove(p, path))
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    pub fn discard_changes(&self) -> ReleaseResult<()> {
        self.mutate("checkout .", cmd::discard_changes)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    pub fn clean_untracked(&self) -> ReleaseResult<()> {
        self.mutate("clean -df", cmd::clean_untracked)
    }
}

impl StepContext for Repo {
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(Self::current_branch(self)?)
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        Ok(Self::checkout(self, branch)?)
    }
}
