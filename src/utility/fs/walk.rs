// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use bon::Builder;
use flume::unbounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;
use wax::{Glob, Program};

/// Options for directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Report symlinks that resolve to a regular file, without following
    /// directory links
    #[builder(setters(name = with_include_file_links), default = false)]
    include_file_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = true)]
    respect_gitignore: bool,
    /// Skip directories matching these names (exact match)
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    #[must_use]
    pub const fn include_file_links(&self) -> bool {
        self.include_file_links
    }

    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options for scanning a checked-out repository as it is on disk.
    ///
    /// - Includes hidden files
    /// - Includes symlinks to files (rsync publishes their targets)
    /// - Ignores .gitignore (ignored files still get published by rsync)
    /// - Skips `.git`
    #[must_use]
    pub fn for_source_tree() -> Self {
        Self::builder()
            .with_include_hidden(true)
            .with_include_file_links(true)
            .with_respect_gitignore(false)
            .with_skip_dirs(vec![".git".to_string()])
            .build()
    }
}

/// Files found by a walk, sorted by path.
#[derive(Debug)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    error_count: usize,
}

impl WalkResult {
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of entries that could not be read.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Builds a `WalkBuilder` with the given options, using `filter_entry` for directory skipping.
fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if let Some(depth) = options.max_depth() {
        builder.max_depth(Some(depth));
    }

    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());
    builder.ignore(options.respect_gitignore());
    builder.parents(options.respect_gitignore());

    // Evaluated before descending, so skipped trees are never read.
    if !options.skip_dirs().is_empty() {
        let skip_dirs: Arc<Vec<String>> = Arc::new(options.skip_dirs().to_vec());
        builder.filter_entry(move |entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir())
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name)))
        });
    }

    builder
}

/// Collects every regular file under `root` that passes `keep`, plus file
/// symlinks when [`WalkOptions::include_file_links`] is set.
///
/// Runs on `ignore::WalkParallel`; results are gathered over a flume channel
/// and sorted so callers see a stable order.
fn collect_files<F>(root: &Path, options: &WalkOptions, keep: F) -> Result<WalkResult>
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let (tx, rx) = unbounded::<PathBuf>();
    let error_count = AtomicUsize::new(0);
    let keep = &keep;
    let error_count_ref = &error_count;
    let include_file_links = options.include_file_links();

    build_walker(root, options).build_parallel().run(|| {
        let tx = tx.clone();
        Box::new(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| {
                        ft.is_file()
                            || (include_file_links && ft.is_symlink() && entry.path().is_file())
                    });
                    if is_file && keep(entry.path()) {
                        // Receiver outlives the walk.
                        let _ = tx.send(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "walk error");
                    error_count_ref.fetch_add(1, Ordering::Relaxed);
                }
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut files: Vec<PathBuf> = rx.iter().collect();
    files.sort();

    Ok(WalkResult {
        files,
        error_count: error_count.load(Ordering::Relaxed),
    })
}

/// Walks `root` and returns every regular file.
///
/// # Errors
///
/// Returns an error if the root directory does not exist.
///
/// # Example
/// ```no_run
/// use unity_release::utility::fs::walk::{walk_files, WalkOptions};
///
/// let result = walk_files("../mopub-unity", &WalkOptions::for_source_tree())?;
/// println!("Found {} files", result.files().len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn walk_files<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<WalkResult> {
    collect_files(root.as_ref(), options, |_| true)
}

/// Finds files whose path relative to `root` matches a glob pattern.
///
/// # Errors
///
/// Returns an error if:
/// - The root directory does not exist.
/// - The glob pattern is invalid.
///
/// # Example
/// ```no_run
/// use unity_release::utility::fs::walk::{find_files, WalkOptions};
///
/// let jars = find_files("../mopub-unity-sdk", "**/unity*.jar", &WalkOptions::for_source_tree())?;
/// for file in jars {
///     println!("{}", file.display());
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn find_files<P: AsRef<Path>>(
    root: P,
    pattern: &str,
    options: &WalkOptions,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let glob =
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    let result = collect_files(root, options, |path| {
        path.strip_prefix(root)
            .is_ok_and(|rel_path| glob.is_match(rel_path))
    })?;
    Ok(result.into_files())
}
