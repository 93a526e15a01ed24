// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release flows: candidate branches in the private repository and their
//! promotion to the public mirror.
//!
//! ```text
//! internal-candidate           candidate                    promote
//! ------------------           ---------                    -------
//! create_release_branch        create_release_branch        prepare_public_repo
//! update_sdk_submodules        update_sdk_submodules        copy_release_branch_to
//! commit_all_changes           commit_all_changes           fix_git_history
//! update_sample_app_version    (cherry_pick_to_main)        remove_unreleased_code
//! commit_all_changes           update_sample_app_version    reset_sdk_submodules
//! build_wrappers_and_export    commit_all_changes           update_sdk_submodules
//! commit_release_branch        (cherry_pick_to_main)        commit_public_release
//! (push_private_release)       make_build_scripts_public    recover_sdk_submodules
//!                              commit_all_changes
//!                              remove_internal_submodules
//!                              strip_private_lines
//!                              build_wrappers_and_export
//!                              commit_release_branch
//!                              (push_private_release)
//!
//! (...) = skipped with --test
//! ```
//!
//! Every step runs inside a [`Step`], which checks out the step's branch first
//! and logs `release step completed` afterwards. With `global.dry` set, git
//! mutations, file rewrites and external commands are logged and skipped.

pub mod version;

#[cfg(test)]
mod tests;

use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use tracing::{error, info};

use crate::cli::release::{CandidateArgs, PromoteArgs};
use crate::config::Config;
use crate::error::{Result, SanitizeError};
use crate::git::Repo;
use crate::pipeline::Step;
use crate::process::ProcessBuilder;
use crate::sanitize::{PatchRule, StripRule, process_directory, replace_file_lines};
use crate::utility::fs::copy::{copy_dir_all, replace_dir};
use crate::utility::fs::walk::{WalkOptions, find_files};

use version::ReleaseVersion;

/// Line in the native build scripts selecting internal or public SDKs.
pub const INTERNAL_SDK_PATTERN: &str = r":.*INTERNAL_SDK:=.*";
/// Replacement for [`INTERNAL_SDK_PATTERN`] defaulting to the public SDKs.
pub const PUBLIC_SDK_LINE: &str = r#": "${INTERNAL_SDK:=false}""#;
/// Scripting define symbol lines in `ProjectSettings.asset`.
pub const DEFINES_PATTERN: &str = r"(\s*\d+:\s*)(.*)";

/// Rules rewriting the sample app version, one per platform field.
///
/// Applied one file pass each, so every field must be present.
///
/// # Errors
///
/// Returns `SanitizeError::InvalidPattern` if a pattern fails to compile.
pub fn sample_app_version_rules(
    version: &ReleaseVersion,
) -> std::result::Result<[PatchRule; 3], SanitizeError> {
    let code = version.bundle_code();
    Ok([
        PatchRule::literal(r"  bundleVersion: .*", &format!("  bundleVersion: {version}"))?,
        PatchRule::literal(r"    iOS: \d+", &format!("    iOS: {code}"))?,
        PatchRule::literal(
            r"  AndroidBundleVersionCode: \d+",
            &format!("  AndroidBundleVersionCode: {code}"),
        )?,
    ])
}

/// Rule switching a build script's `INTERNAL_SDK` default to `false`.
///
/// # Errors
///
/// Returns `SanitizeError::InvalidPattern` if the pattern fails to compile.
pub fn public_sdk_rule() -> std::result::Result<PatchRule, SanitizeError> {
    PatchRule::literal(INTERNAL_SDK_PATTERN, PUBLIC_SDK_LINE)
}

/// Rule removing `stripped` symbols from `;`-separated define lists.
///
/// # Errors
///
/// Returns `SanitizeError::InvalidPattern` if the pattern fails to compile.
pub fn defines_rule(stripped: &[String]) -> std::result::Result<PatchRule, SanitizeError> {
    let stripped = stripped.to_vec();
    PatchRule::with_fn(DEFINES_PATTERN, move |caps| {
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let symbols = caps.get(2).map_or("", |m| m.as_str());
        let kept: Vec<&str> = symbols
            .split(';')
            .filter(|symbol| !stripped.iter().any(|s| s == symbol))
            .collect();
        format!("{prefix}{}", kept.join(";"))
    })
}

/// One release of one version, bound to both repositories.
#[derive(Debug)]
pub struct Release<'a> {
    config: &'a Config,
    version: ReleaseVersion,
    private: Repo,
    public: Repo,
}

impl<'a> Release<'a> {
    /// # Errors
    ///
    /// Returns an error if the repository paths were never resolved.
    pub fn new(config: &'a Config, version: ReleaseVersion) -> Result<Self> {
        let dry_run = config.global.dry;
        Ok(Self {
            private: Repo::new(config.paths.private_repo()?, dry_run),
            public: Repo::new(config.paths.public_repo()?, dry_run),
            config,
            version,
        })
    }

    #[must_use]
    pub const fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    #[must_use]
    pub const fn private_repo(&self) -> &Repo {
        &self.private
    }

    #[must_use]
    pub const fn public_repo(&self) -> &Repo {
        &self.public
    }

    const fn dry_run(&self) -> bool {
        self.private.is_dry_run()
    }

    fn main_branch(&self) -> &str {
        &self.config.git.main_branch
    }

    fn remote(&self) -> &str {
        &self.config.git.remote
    }

    fn release_message(&self) -> String {
        format!("Release: version {}", self.version)
    }

    // --- flows ---

    /// Candidate built from the latest internal SDKs; nothing is removed.
    ///
    /// Returns the release branch name.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub async fn create_internal_candidate(
        &self,
        release_hash: Option<&str>,
        test: bool,
    ) -> Result<String> {
        let branch = self.create_release_branch(release_hash, true, test)?;

        self.update_sdk_submodules(&self.private, false)?;
        self.commit_all_changes(
            &self.private,
            &branch,
            "Update to latest Android and iOS SDKs",
            true,
        )?;
        self.update_sample_app_version(&branch)?;
        self.commit_all_changes(
            &self.private,
            &branch,
            &format!("Update bundle version and codes to {}", self.version),
            false,
        )?;

        self.build_wrappers_and_export_package(&branch).await?;
        self.commit_release_branch(&branch, true)?;
        if !test {
            self.push_private_release_branch(&branch, true)?;
        }

        info!(
            branch = %branch,
            "internal candidate branch created; run through release testing, then create the release candidate once the SDKs have been released"
        );
        Ok(branch)
    }

    /// Tagged candidate with internal code removed, ready for promotion.
    ///
    /// Returns the release branch name.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub async fn create_candidate(&self, release_hash: Option<&str>, test: bool) -> Result<String> {
        let branch = self.create_release_branch(release_hash, false, test)?;

        // changes that also apply to private main
        self.update_sdk_submodules(&self.private, false)?;
        self.commit_all_changes(
            &self.private,
            &branch,
            "Update to latest Android and iOS SDKs",
            true,
        )?;
        if !test {
            self.cherry_pick_to_main(&branch)?;
        }
        self.update_sample_app_version(&branch)?;
        self.commit_all_changes(
            &self.private,
            &branch,
            &format!("Update bundle version and codes to {}", self.version),
            false,
        )?;
        if !test {
            self.cherry_pick_to_main(&branch)?;
        }

        // changes only for the public repo
        self.make_build_scripts_use_public_sdks(&branch)?;
        self.commit_all_changes(
            &self.private,
            &branch,
            "Make build scripts use public SDKs",
            false,
        )?;
        self.remove_internal_submodules(&branch)?;
        self.strip_private_lines(&branch)?;
        self.build_wrappers_and_export_package(&branch).await?;
        self.commit_release_branch(&branch, false)?;
        if !test {
            self.push_private_release_branch(&branch, false)?;
        }

        info!(
            branch = %branch,
            "candidate branch created; run through release testing, then promote it"
        );
        Ok(branch)
    }

    /// Copies the candidate branch over the public mirror and commits it.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub async fn promote(&self) -> Result<()> {
        {
            let staging = tempfile::Builder::new()
                .prefix("unity-release-history")
                .tempdir()
                .context("failed to create staging directory")?;
            self.prepare_public_repo(staging.path()).await?;
            self.copy_release_branch_to(&self.version.branch_name(false))
                .await?;
            self.fix_git_history(staging.path()).await?;
        }

        self.remove_unreleased_code()?;
        self.reset_sdk_submodules(&self.public)?;
        self.update_sdk_submodules(&self.public, true)?;
        self.commit_public_release()?;
        self.recover_sdk_submodules(self.main_branch())?;

        info!("release preparation completed; on private main you have 1 commit to review and push");
        info!(
            "on public main you have 1 commit to review and push; make sure to push tags: 'git push --tags {} {}'",
            self.remote(),
            self.main_branch()
        );
        Ok(())
    }

    // --- steps ---

    /// Creates `release-<v>` (or `internal-release-<v>`) at `release_hash`,
    /// defaulting to the tip of the main branch.
    ///
    /// # Errors
    ///
    /// Returns `GitError::BranchExists` if the branch is already on the remote
    /// (not checked in test mode), or any git failure.
    pub fn create_release_branch(
        &self,
        release_hash: Option<&str>,
        internal: bool,
        test: bool,
    ) -> Result<String> {
        Step::new("create_release_branch").run(&self.private, || {
            let base = if let Some(hash) = release_hash {
                hash.to_string()
            } else {
                if !test {
                    self.private.checkout(self.main_branch())?;
                    self.private.pull()?;
                }
                self.private.head_hash()?
            };

            let branch = self.version.branch_name(internal);
            if !test {
                self.private
                    .ensure_branch_unpublished(self.remote(), &branch)?;
            }
            self.private.create_branch_at(&branch, &base)?;
            Ok(branch)
        })
    }

    /// Pulls the main branch of every external SDK submodule, and of the
    /// internal ones unless `external_only`.
    ///
    /// # Errors
    ///
    /// Returns the first failing pull.
    pub fn update_sdk_submodules(&self, repo: &Repo, external_only: bool) -> Result<()> {
        Step::new("update_sdk_submodules").run(repo, || {
            let internal: &[String] = if external_only {
                &[]
            } else {
                &self.config.submodules.internal
            };
            for submodule in self.config.submodules.external.iter().chain(internal) {
                repo.child(submodule)
                    .pull_from(self.remote(), self.main_branch())
                    .with_context(|| format!("failed to update submodule {submodule}"))?;
            }
            Ok(())
        })
    }

    /// Discards local changes and untracked files in the external submodules.
    ///
    /// # Errors
    ///
    /// Returns the first failing git command.
    pub fn reset_sdk_submodules(&self, repo: &Repo) -> Result<()> {
        Step::new("reset_sdk_submodules").run(repo, || {
            for submodule in &self.config.submodules.external {
                let sub = repo.child(submodule);
                sub.discard_changes()?;
                sub.clean_untracked()?;
            }
            Ok(())
        })
    }

    /// Brings the submodules of the private repository back after promotion.
    ///
    /// # Errors
    ///
    /// Returns the first failing git command.
    pub fn recover_sdk_submodules(&self, branch: &str) -> Result<()> {
        Step::new("recover_sdk_submodules")
            .on_branch(branch)
            .run(&self.private, || {
                self.private.submodule_init()?;
                self.private.submodule_update_recursive()?;
                Ok(())
            })
    }

    /// Commits all tracked changes on `branch` and returns the new HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout or the commit fails.
    pub fn commit_all_changes(
        &self,
        repo: &Repo,
        branch: &str,
        message: &str,
        allow_empty: bool,
    ) -> Result<String> {
        Step::new("commit_all_changes")
            .on_branch(branch)
            .run(repo, || Ok(repo.commit_all(message, allow_empty)?))
    }

    /// Writes the version and bundle codes into the sample app settings.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::PatchValidation` if a version field is missing.
    pub fn update_sample_app_version(&self, branch: &str) -> Result<()> {
        Step::new("update_sample_app_version")
            .on_branch(branch)
            .run(&self.private, || {
                let settings = self.config.paths.project_settings()?;
                for rule in sample_app_version_rules(&self.version)? {
                    self.patch_file(settings, rule)?;
                }
                Ok(())
            })
    }

    /// Points the native build scripts at the public SDKs and drops the
    /// internal define symbols from the sample app.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::PatchValidation` if a script has no
    /// `INTERNAL_SDK` line or the settings have no define lines.
    pub fn make_build_scripts_use_public_sdks(&self, branch: &str) -> Result<()> {
        Step::new("make_build_scripts_use_public_sdks")
            .on_branch(branch)
            .run(&self.private, || {
                for script in self.config.paths.native_build_scripts()? {
                    self.patch_file(script, public_sdk_rule()?)?;
                    self.ensure_executable(script)?;
                }
                self.patch_file(
                    self.config.paths.project_settings()?,
                    defines_rule(&self.config.sanitize.stripped_defines)?,
                )
            })
    }

    /// Removes the internal SDK submodules from the index and work tree.
    ///
    /// # Errors
    ///
    /// Returns the first failing `git rm`.
    pub fn remove_internal_submodules(&self, branch: &str) -> Result<()> {
        Step::new("remove_internal_submodules")
            .on_branch(branch)
            .run(&self.private, || {
                for submodule in &self.config.submodules.internal {
                    self.private.remove(submodule)?;
                }
                Ok(())
            })
    }

    /// Deletes private marker lines from source files in the private repo.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker does not compile or a file cannot be
    /// rewritten.
    pub fn strip_private_lines(&self, branch: &str) -> Result<()> {
        Step::new("strip_private_lines")
            .on_branch(branch)
            .run(&self.private, || {
                let sanitize = &self.config.sanitize;
                let rule = StripRule::new(&sanitize.private_marker, sanitize.suffix.clone())?;
                if self.dry_run() {
                    info!(root = %self.private.path().display(), "dry run: strip private lines");
                    return Ok(());
                }
                process_directory(self.private.path(), &rule)?;
                Ok(())
            })
    }

    /// Runs the package build script from the private repository root.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the script fails to start or exits non-zero.
    pub async fn build_wrappers_and_export_package(&self, branch: &str) -> Result<()> {
        Step::new("build_wrappers_and_export_package")
            .on_branch(branch)
            .run_async(&self.private, async || {
                let script = self.config.paths.package_build_script()?;
                let builder = ProcessBuilder::new(script)
                    .cwd(self.private.path())
                    .name("build");
                if self.dry_run() {
                    info!(cmd = %builder.command_line(), "dry run: build");
                    return Ok(());
                }
                builder.run().await?;
                Ok(())
            })
            .await
    }

    /// Commits the release and, unless internal, tags it `v<version>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit or the tag fails.
    pub fn commit_release_branch(&self, branch: &str, internal: bool) -> Result<()> {
        Step::new("commit_release_branch")
            .on_branch(branch)
            .run(&self.private, || {
                self.commit_all_changes(&self.private, branch, &self.release_message(), false)?;
                if !internal {
                    self.tag_release(&self.private)?;
                }
                Ok(())
            })
    }

    /// Pushes the release branch and, unless internal, force-pushes its tag.
    ///
    /// # Errors
    ///
    /// Returns an error if a push is rejected.
    pub fn push_private_release_branch(&self, branch: &str, internal: bool) -> Result<()> {
        Step::new("push_private_release_branch")
            .on_branch(branch)
            .run(&self.private, || {
                self.private.push(self.remote(), branch, false)?;
                if !internal {
                    self.private.push(self.remote(), &self.version.tag(), true)?;
                }
                Ok(())
            })
    }

    /// Cherry-picks the tip of `branch` onto main, then returns to `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error on conflicts or a failed checkout.
    pub fn cherry_pick_to_main(&self, branch: &str) -> Result<()> {
        Step::new("cherry_pick_to_main")
            .on_branch(branch)
            .run(&self.private, || {
                self.private.checkout(self.main_branch())?;
                self.private.cherry_pick(branch)?;
                self.private.checkout(branch)?;
                Ok(())
            })
    }

    /// Updates the public main branch and stashes its `.git` in `staging`.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout, the pull or the copy fails.
    pub async fn prepare_public_repo(&self, staging: &Path) -> Result<()> {
        Step::new("prepare_public_repo")
            .run_async(&self.public, async || {
                self.public.checkout(self.main_branch())?;
                self.public.pull()?;
                let history = self.public.path().join(".git");
                if self.dry_run() {
                    info!(from = %history.display(), to = %staging.display(), "dry run: save git history");
                    return Ok(());
                }
                copy_dir_all(&history, &staging.join(".git")).await
            })
            .await
    }

    /// Mirrors the private work tree on `branch` into the public repository.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if `rsync` is missing or fails.
    pub async fn copy_release_branch_to(&self, branch: &str) -> Result<()> {
        Step::new("copy_release_branch_to")
            .on_branch(branch)
            .run_async(&self.private, async || {
                let mut source = self.private.path().as_os_str().to_os_string();
                source.push("/");
                let builder = ProcessBuilder::which("rsync")?
                    .args(["-aWL", "--delete"])
                    .arg(source)
                    .arg(self.public.path());
                if self.dry_run() {
                    info!(cmd = %builder.command_line(), "dry run: rsync");
                    return Ok(());
                }
                builder.run().await?;
                Ok(())
            })
            .await
    }

    /// Puts the public repository's own `.git` back from `staging`.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    pub async fn fix_git_history(&self, staging: &Path) -> Result<()> {
        Step::new("fix_git_history")
            .run_async(&self.public, async || {
                let history = self.public.path().join(".git");
                if self.dry_run() {
                    info!(to = %history.display(), "dry run: restore git history");
                    return Ok(());
                }
                replace_dir(&staging.join(".git"), &history).await
            })
            .await
    }

    /// Deletes private directories and unreleased build artifacts from the
    /// public repository.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob is invalid or a path cannot be removed.
    pub fn remove_unreleased_code(&self) -> Result<()> {
        Step::new("remove_unreleased_code").run(&self.public, || {
            let root = self.public.path();
            let publish = &self.config.publish;

            for dir in &publish.private_dirs {
                let path = root.join(dir);
                if self.dry_run() {
                    info!(path = %path.display(), "dry run: remove directory");
                    continue;
                }
                match std::fs::remove_dir_all(&path) {
                    Ok(()) => info!(path = %path.display(), "removed directory"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("failed to remove {}", path.display()));
                    }
                }
            }

            let options = WalkOptions::for_source_tree();
            for pattern in &publish.artifact_globs {
                for file in find_files(root, pattern, &options)? {
                    if self.dry_run() {
                        info!(file = %file.display(), "dry run: remove artifact");
                        continue;
                    }
                    std::fs::remove_file(&file)
                        .with_context(|| format!("failed to remove {}", file.display()))?;
                    info!(file = %file.display(), "removed artifact");
                }
            }
            Ok(())
        })
    }

    /// Stages everything in the public repository, commits and tags it.
    ///
    /// # Errors
    ///
    /// Returns an error if staging, the commit or the tag fails.
    pub fn commit_public_release(&self) -> Result<()> {
        Step::new("commit_public_release").run(&self.public, || {
            self.public.add_all()?;
            self.commit_all_changes(
                &self.public,
                self.main_branch(),
                &self.release_message(),
                false,
            )?;
            self.tag_release(&self.public)
        })
    }

    // --- helpers ---

    fn tag_release(&self, repo: &Repo) -> Result<()> {
        repo.tag_annotated(
            &self.version.tag(),
            &format!("Version: {}", self.version),
            true,
        )?;
        Ok(())
    }

    fn patch_file(&self, path: &Path, rule: PatchRule) -> Result<()> {
        if self.dry_run() {
            info!(file = %path.display(), %rule, "dry run: patch");
            return Ok(());
        }
        replace_file_lines(path, [rule])?;
        Ok(())
    }

    #[cfg(unix)]
    fn ensure_executable(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        if self.dry_run() {
            return Ok(());
        }
        let mut permissions = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .permissions();
        permissions.set_mode(permissions.mode() | 0o111);
        std::fs::set_permissions(path, permissions)
            .with_context(|| format!("failed to chmod {}", path.display()))
    }

    #[cfg(not(unix))]
    fn ensure_executable(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

// --- command handlers ---

/// Handler for `internal-candidate`.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or any step fails.
pub async fn run_internal_candidate_command(
    args: &CandidateArgs,
    config: &Config,
    assume_yes: bool,
) -> Result<()> {
    let intro = if args.test {
        TEST_MODE_INTRO
    } else {
        "This will push an internal release candidate branch, built from the latest internal SDKs, to the private repo."
    };
    confirm(intro, assume_yes)?;

    let release = Release::new(config, args.version.clone())?;
    report(
        release
            .create_internal_candidate(args.release_hash.as_deref(), args.test)
            .await
            .map(drop),
    )
}

/// Handler for `candidate`.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or any step fails.
pub async fn run_candidate_command(
    args: &CandidateArgs,
    config: &Config,
    assume_yes: bool,
) -> Result<()> {
    let intro = if args.test {
        TEST_MODE_INTRO
    } else {
        "This will push a tagged release candidate branch to the private repo."
    };
    confirm(intro, assume_yes)?;

    let release = Release::new(config, args.version.clone())?;
    report(
        release
            .create_candidate(args.release_hash.as_deref(), args.test)
            .await
            .map(drop),
    )
}

/// Handler for `promote`.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or any step fails.
pub async fn run_promote_command(args: &PromoteArgs, config: &Config, assume_yes: bool) -> Result<()> {
    confirm(
        "This will take a tagged release candidate and publish it on the public repo.",
        assume_yes,
    )?;

    let release = Release::new(config, args.version.clone())?;
    report(release.promote().await)
}

const TEST_MODE_INTRO: &str =
    "Running in TEST mode. The release candidate branch will not be pushed.";

/// Prints `intro` and waits for Enter unless `assume_yes`.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub fn confirm(intro: &str, assume_yes: bool) -> Result<()> {
    println!("{intro}");
    if assume_yes {
        return Ok(());
    }
    println!("Press Enter to continue...(Ctrl+C to Cancel)");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read confirmation")?;
    Ok(())
}

fn report(result: Result<()>) -> Result<()> {
    result.inspect_err(|e| error!(error = %format!("{e:#}"), "release script failed"))
}
