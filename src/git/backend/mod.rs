// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix), ShellBackend
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```

use crate::error::{GitError, GixError, ReleaseResult};
use std::path::Path;
use tracing::trace;

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> ReleaseResult<Option<String>>;

    /// Full hex id of the commit HEAD points to.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository has no commits yet.
    fn head_hash(path: &Path) -> ReleaseResult<String>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or status check fails.
    fn has_uncommitted_changes(path: &Path) -> ReleaseResult<bool>;
}

// --- Mutation Trait (Write operations) ---

/// Git operations that modify repository state.
///
/// Everything here goes through the git CLI so hooks, credential helpers and
/// submodule handling behave exactly as they do for a developer at a shell.
pub trait GitMutation {
    /// Checkout a branch, tag, or commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the checkout fails.
    fn checkout(repo_path: &Path, what: &str) -> ReleaseResult<()>;

    /// Create `branch` at `start_point` and switch to it.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch exists or `start_point` is unknown.
    fn create_branch_at(repo_path: &Path, branch: &str, start_point: &str) -> ReleaseResult<()>;

    /// Pull the current branch from its upstream.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails.
    fn pull(repo_path: &Path) -> ReleaseResult<()>;

    /// Pull `branch` from `remote` into the current branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails.
    fn pull_from(repo_path: &Path, remote: &str, branch: &str) -> ReleaseResult<()>;

    /// Commit all tracked changes (`commit -am`).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if there is nothing to commit and `allow_empty`
    /// is false, or the commit fails.
    fn commit_all(repo_path: &Path, message: &str, allow_empty: bool) -> ReleaseResult<()>;

    /// Stage every change, including untracked and deleted files.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if staging fails.
    fn add_all(repo_path: &Path) -> ReleaseResult<()>;

    /// Create an annotated tag on HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the tag exists and `force` is false.
    fn tag_annotated(repo_path: &Path, name: &str, message: &str, force: bool)
    -> ReleaseResult<()>;

    /// Push a refspec to a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the push is rejected.
    fn push(repo_path: &Path, remote: &str, refspec: &str, force: bool) -> ReleaseResult<()>;

    /// Cherry-pick `rev` onto the current branch, recording its origin.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` on conflicts.
    fn cherry_pick(repo_path: &Path, rev: &str) -> ReleaseResult<()>;

    /// Merge `branch` into the current branch without editing the message.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` on conflicts.
    fn merge(repo_path: &Path, branch: &str) -> ReleaseResult<()>;

    /// `git submodule init`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    fn submodule_init(repo_path: &Path) -> ReleaseResult<()>;

    /// `git submodule update --recursive`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if a submodule cannot be checked out.
    fn submodule_update_recursive(repo_path: &Path) -> ReleaseResult<()>;

    /// Remove a path (file or submodule) from the index and work tree.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the path is not tracked.
    fn remove(repo_path: &Path, path: &str) -> ReleaseResult<()>;

    /// Discard unstaged changes to tracked files.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    fn discard_changes(repo_path: &Path) -> ReleaseResult<()>;

    /// Delete untracked files and directories.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    fn clean_untracked(repo_path: &Path) -> ReleaseResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Read-only operations without spawning subprocesses.
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn current_branch(path: &Path) -> ReleaseResult<Option<String>> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn head_hash(path: &Path) -> ReleaseResult<String> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        let id = repo
            .head_id()
            .map_err(|e| GitError::Gix(GixError::HeadId(Box::new(e))))?;
        Ok(id.to_string())
    }

    fn has_uncommitted_changes(path: &Path) -> ReleaseResult<bool> {
        use gix::status::UntrackedFiles;

        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to prepare status check".to_string(),
            })?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to check repository status".to_string(),
            })?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// Returns trimmed stdout.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> ReleaseResult<String> {
        use std::process::Command;

        trace!(cwd = %cwd.display(), args = ?args, "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message,
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether `branch` exists on `remote`, via `ls-remote --heads`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be contacted.
    pub fn remote_branch_exists(repo_path: &Path, remote: &str, branch: &str) -> ReleaseResult<bool> {
        let refname = format!("refs/heads/{branch}");
        let output = Self::git_command(&["ls-remote", "--heads", remote, &refname], repo_path)?;
        Ok(output
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .any(|name| name == refname))
    }
}

impl GitMutation for ShellBackend {
    fn checkout(repo_path: &Path, what: &str) -> ReleaseResult<()> {
        Self::git_command(
            &["-c", "advice.detachedHead=false", "checkout", "-q", what],
            repo_path,
        )?;
        Ok(())
    }

    fn create_branch_at(repo_path: &Path, branch: &str, start_point: &str) -> ReleaseResult<()> {
        Self::git_command(&["checkout", "-q", "-b", branch, start_point], repo_path)?;
        Ok(())
    }

    fn pull(repo_path: &Path) -> ReleaseResult<()> {
        Self::git_command(&["pull", "--quiet"], repo_path)?;
        Ok(())
    }

    fn pull_from(repo_path: &Path, remote: &str, branch: &str) -> ReleaseResult<()> {
        Self::git_command(&["pull", "--quiet", remote, branch], repo_path)?;
        Ok(())
    }

    fn commit_all(repo_path: &Path, message: &str, allow_empty: bool) -> ReleaseResult<()> {
        let mut args = vec!["commit", "--quiet"];
        if allow_empty {
            args.push("--allow-empty");
        }
        args.extend(["-am", message]);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn add_all(repo_path: &Path) -> ReleaseResult<()> {
        Self::git_command(&["add", "-A", "."], repo_path)?;
        Ok(())
    }

    fn tag_annotated(
        repo_path: &Path,
        name: &str,
        message: &str,
        force: bool,
    ) -> ReleaseResult<()> {
        let mut args = vec!["tag"];
        if force {
            args.push("-f");
        }
        args.extend(["-a", name, "-m", message]);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn push(repo_path: &Path, remote: &str, refspec: &str, force: bool) -> ReleaseResult<()> {
        let mut args = vec!["push", "--quiet"];
        if force {
            args.push("--force");
        }
        args.extend([remote, refspec]);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn cherry_pick(repo_path: &Path, rev: &str) -> ReleaseResult<()> {
        Self::git_command(&["cherry-pick", "-x", "--allow-empty", rev], repo_path)?;
        Ok(())
    }

    fn merge(repo_path: &Path, branch: &str) -> ReleaseResult<()> {
        Self::git_command(&["merge", "--no-edit", branch], repo_path)?;
        Ok(())
    }

    fn submodule_init(repo_path: &Path) -> ReleaseResult<()> {
        Self::git_command(&["submodule", "init"], repo_path)?;
        Ok(())
    }

    fn submodule_update_recursive(repo_path: &Path) -> ReleaseResult<()> {
        Self::git_command(&["submodule", "update", "--recursive"], repo_path)?;
        Ok(())
    }

    fn remove(repo_path: &Path, path: &str) -> ReleaseResult<()> {
        Self::git_command(&["rm", "-f", "--quiet", path], repo_path)?;
        Ok(())
    }

    fn discard_changes(repo_path: &Path) -> ReleaseResult<()> {
        Self::git_command(&["checkout", "-q", "."], repo_path)?;
        Ok(())
    }

    fn clean_untracked(repo_path: &Path) -> ReleaseResult<()> {
        Self::git_command(&["clean", "-df", "--quiet"], repo_path)?;
        Ok(())
    }
}

impl GitQuery for ShellBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::git_command(&["rev-parse", "--is-inside-work-tree"], path).is_ok()
    }

    fn current_branch(path: &Path) -> ReleaseResult<Option<String>> {
        Self::git_command(&["symbolic-ref", "--short", "HEAD"], path)
            .map_or_else(|_| Ok(None), |branch| Ok(Some(branch)))
    }

    fn head_hash(path: &Path) -> ReleaseResult<String> {
        Self::git_command(&["rev-parse", "HEAD"], path)
    }

    fn has_uncommitted_changes(path: &Path) -> ReleaseResult<bool> {
        let output = Self::git_command(&["status", "--porcelain"], path)?;
        Ok(!output.is_empty())
    }
}
