// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Private line removal.
//!
//! Works on raw bytes so files that are not valid UTF-8 pass through intact;
//! the marker regex still matches Unicode text where the bytes decode.

use std::path::Path;

use regex::bytes::{Regex, RegexBuilder};
use tracing::{debug, info, instrument};

use super::atomic::atomic_write;
use crate::error::{self, SanitizeError};
use crate::utility::fs::walk::{WalkOptions, walk_files};

/// Marks comment lines that never leave the private repository:
/// `// TODO`, `//TODO`, `* TODO` and `*TODO`, optionally indented.
pub const DEFAULT_PRIVATE_MARKER: &str = r"^\s*(//|\*)\s?TODO";

/// Which files to visit and which of their lines to drop.
#[derive(Debug, Clone)]
pub struct StripRule {
    marker: Regex,
    suffix: String,
}

impl StripRule {
    /// Compiles `pattern` case-insensitively, with every alternative
    /// anchored at the start of a line.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::InvalidPattern` if `pattern` does not compile.
    pub fn new(pattern: &str, suffix: impl Into<String>) -> Result<Self, SanitizeError> {
        let marker = RegexBuilder::new(&format!("^(?:{pattern})"))
            .case_insensitive(true)
            .unicode(true)
            .build()
            .map_err(|source| SanitizeError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            marker,
            suffix: suffix.into(),
        })
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether the file name ends with the configured suffix.
    #[must_use]
    pub fn matches_file(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.as_encoded_bytes().ends_with(self.suffix.as_bytes()))
    }

    /// Whether `line` starts with the private marker. A trailing `\n` or
    /// `\r\n` is not part of the text the marker sees.
    #[must_use]
    pub fn is_private(&self, line: &[u8]) -> bool {
        self.marker.is_match(trim_line_ending(line))
    }

    /// Returns `input` without its private lines, and how many were removed.
    #[must_use]
    pub fn strip_bytes(&self, input: &[u8]) -> (Vec<u8>, usize) {
        let mut output = Vec::with_capacity(input.len());
        let mut removed = 0;
        for line in input.split_inclusive(|&b| b == b'\n') {
            if self.is_private(line) {
                removed += 1;
            } else {
                output.extend_from_slice(line);
            }
        }
        (output, removed)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .unwrap_or(line)
}

/// Totals from a [`process_directory`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripSummary {
    /// Files whose name matched the suffix.
    pub files_visited: usize,
    /// Files that had at least one line removed.
    pub files_changed: usize,
    /// Lines removed across all files.
    pub lines_removed: usize,
}

/// Removes private lines from one file, returning how many were removed.
///
/// A file without private lines is not rewritten.
///
/// # Errors
///
/// Returns `SanitizeError::Io` if the file cannot be read or replaced.
pub fn strip_file(path: &Path, rule: &StripRule) -> Result<usize, SanitizeError> {
    let input = std::fs::read(path).map_err(|e| SanitizeError::io(path, e))?;
    let (output, removed) = rule.strip_bytes(&input);
    if removed > 0 {
        atomic_write(path, &output)?;
        debug!(file = %path.display(), lines = removed, "stripped private lines");
    }
    Ok(removed)
}

/// Strips private lines from every matching file under `root`.
///
/// Hidden files are included and `.gitignore` is not honoured, since ignored
/// files are still copied to the public mirror. `.git` is skipped. Symlinks
/// to files are visited and their targets rewritten, because the mirror copy
/// dereferences them.
///
/// # Errors
///
/// Returns an error if `root` does not exist, any entry cannot be read, or a
/// file cannot be rewritten.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn process_directory(root: &Path, rule: &StripRule) -> error::Result<StripSummary> {
    let walk = walk_files(root, &WalkOptions::for_source_tree())?;
    if walk.error_count() > 0 {
        anyhow::bail!(
            "{} entries under {} could not be read",
            walk.error_count(),
            root.display()
        );
    }

    let mut summary = StripSummary::default();
    for file in walk.files().iter().filter(|f| rule.matches_file(f)) {
        summary.files_visited += 1;
        let removed = strip_file(file, rule)?;
        if removed > 0 {
            summary.files_changed += 1;
            summary.lines_removed += removed;
        }
    }

    info!(
        files = summary.files_visited,
        changed = summary.files_changed,
        lines = summary.lines_removed,
        "private lines stripped"
    );
    Ok(summary)
}
