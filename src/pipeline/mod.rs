// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release step middleware.
//!
//! ```text
//! Step::new("update_sample_app_version").on_branch("release-5.1.0")
//!   .run(&repo, || ...)
//!        |
//!        v
//!   before: branch given?  --> empty name: NoBranchName
//!           current != branch --> checkout
//!   body (inside "step" span)
//!   after:  "release step completed"   (skipped if body failed)
//! ```


use tracing::{Instrument, debug, info};

use crate::error::{GitError, Result};
use crate::logging::step_span;

/// What a step needs from the repository it runs in.
pub trait StepContext {
    /// Branch currently checked out, `None` when HEAD is detached.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository state cannot be read.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Switch to `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout fails.
    fn checkout(&self, branch: &str) -> Result<()>;
}

/// A named unit of release work, optionally pinned to a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    branch: Option<String>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: None,
        }
    }

    /// Makes the step check out `branch` before its body runs.
    #[must_use]
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Runs `body` between the step's hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch is empty, the checkout fails, or `body`
    /// fails. The completion message is only logged on success.
    pub fn run<C, T, F>(self, ctx: &C, body: F) -> Result<T>
    where
        C: StepContext + ?Sized,
        F: FnOnce() -> Result<T>,
    {
        let span = step_span(&self.name, self.branch());
        let _entered = span.enter();
        self.before(ctx)?;
        let value = body()?;
        self.after();
        Ok(value)
    }

    /// Async version of [`Step::run`].
    ///
    /// # Errors
    ///
    /// Same as [`Step::run`].
    pub async fn run_async<C, T, F>(self, ctx: &C, body: F) -> Result<T>
    where
        C: StepContext + ?Sized,
        F: AsyncFnOnce() -> Result<T>,
    {
        let span = step_span(&self.name, self.branch());
        span.in_scope(|| self.before(ctx))?;
        let value = body().instrument(span.clone()).await?;
        span.in_scope(|| self.after());
        Ok(value)
    }

    fn before<C: StepContext + ?Sized>(&self, ctx: &C) -> Result<()> {
        let Some(branch) = self.branch() else {
            return Ok(());
        };
        if branch.is_empty() {
            return Err(GitError::NoBranchName {
                step: self.name.clone(),
            }
            .into());
        }
        if ctx.current_branch()?.as_deref() == Some(branch) {
            debug!(branch, "already on branch");
        } else {
            info!(branch, "checking out branch");
            ctx.checkout(branch)?;
        }
        Ok(())
    }

    fn after(&self) {
        info!(step = %self.name, "release step completed");
    }
}
