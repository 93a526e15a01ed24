// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ordered line patching with a "every rule must fire" contract.
//!
//! ```text
//! for line in file:
//!     rule[0] matches? --> replace_all, next line
//!     rule[1] matches? --> replace_all, next line
//!     ...
//!     none            --> copy unchanged
//! any rule with 0 hits --> PatchValidation, file untouched
//! ```
//!
//! Rules are tried in order and the first match wins, so a rule whose pattern
//! also matches an earlier rule's lines is shadowed on those lines. Given
//! `(a -> a)` followed by `(a -> c)`, the second rule never fires and the set
//! fails validation. Callers order rules so this only happens on purpose.
//!
//! Rules expect un-patched input: running the same set over its own output
//! fails once the patterns no longer match.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use tracing::{debug, trace};

use super::atomic::atomic_write;
use crate::error::SanitizeError;

/// Callback computing a replacement from the captures of a match.
pub type ReplaceFn = dyn Fn(&Captures<'_>) -> String + Send + Sync;

/// Replacement text for a [`PatchRule`].
pub enum Replacement {
    /// Template expanded per match; `$1` / `${name}` refer to capture groups
    /// and `$$` is a literal dollar sign.
    Template(String),
    /// Computed from the match, for edits that need to parse the matched text.
    Func(Box<ReplaceFn>),
}

impl Replacement {
    /// Template with capture group placeholders.
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(template.into())
    }

    /// Plain text inserted as-is, even if it contains `$`.
    pub fn literal(text: &str) -> Self {
        Self::Template(text.replace('$', "$$"))
    }

    /// Replacement computed by `f` for each match.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self::Func(Box::new(f))
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.write_str(template),
            Self::Func(_) => f.write_str("<function>"),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// A compiled pattern and what to replace its matches with.
#[derive(Debug)]
pub struct PatchRule {
    pattern: Regex,
    replacement: Replacement,
}

impl PatchRule {
    #[must_use]
    pub const fn new(pattern: Regex, replacement: Replacement) -> Self {
        Self {
            pattern,
            replacement,
        }
    }

    /// Compiles `pattern` and pairs it with a template replacement.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::InvalidPattern` if `pattern` does not compile.
    pub fn template(pattern: &str, template: impl Into<String>) -> Result<Self, SanitizeError> {
        Ok(Self::new(compile(pattern)?, Replacement::template(template)))
    }

    /// Compiles `pattern`; matches are replaced with `text` verbatim.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::InvalidPattern` if `pattern` does not compile.
    pub fn literal(pattern: &str, text: &str) -> Result<Self, SanitizeError> {
        Ok(Self::new(compile(pattern)?, Replacement::literal(text)))
    }

    /// Compiles `pattern` and pairs it with a callback replacement.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::InvalidPattern` if `pattern` does not compile.
    pub fn with_fn<F>(pattern: &str, f: F) -> Result<Self, SanitizeError>
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Ok(Self::new(compile(pattern)?, Replacement::func(f)))
    }

    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    #[must_use]
    pub const fn replacement(&self) -> &Replacement {
        &self.replacement
    }

    /// Rewrites every match in `line`, or returns `None` if nothing matched.
    fn apply(&self, line: &str) -> Option<String> {
        if !self.pattern.is_match(line) {
            return None;
        }
        let replaced = match &self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(line, template.as_str()),
            Replacement::Func(f) => self.pattern.replace_all(line, |caps: &Captures<'_>| f(caps)),
        };
        Some(replaced.into_owned())
    }
}

impl fmt::Display for PatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pattern: {} replacement: {}",
            self.pattern.as_str(),
            self.replacement
        )
    }
}

fn compile(pattern: &str) -> Result<Regex, SanitizeError> {
    Regex::new(pattern).map_err(|source| SanitizeError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Per-rule match counts from a successful patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    path: PathBuf,
    matches: Vec<usize>,
}

impl PatchReport {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines each rule rewrote, in rule order.
    #[must_use]
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Total number of rewritten lines.
    #[must_use]
    pub fn lines_changed(&self) -> usize {
        self.matches.iter().sum()
    }
}

/// Ordered rules applied to one file.
#[derive(Debug)]
pub struct PatchSet {
    path: PathBuf,
    rules: Vec<PatchRule>,
}

impl PatchSet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rules: Vec::new(),
        }
    }

    /// Appends a rule. Earlier rules take precedence on a line.
    #[must_use]
    pub fn rule(mut self, rule: PatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn rules(&self) -> &[PatchRule] {
        &self.rules
    }

    /// Patches `input` in memory, returning the output and per-rule counts.
    ///
    /// Rules see each line without its terminator; `\n` or `\r\n` is carried
    /// over unchanged.
    #[must_use]
    pub fn patch_str(&self, input: &str) -> (String, Vec<usize>) {
        let mut output = String::with_capacity(input.len());
        let mut matches = vec![0usize; self.rules.len()];

        for (number, raw) in input.split_inclusive('\n').enumerate() {
            let (line, ending) = split_line_ending(raw);

            let patched = self
                .rules
                .iter()
                .enumerate()
                .find_map(|(index, rule)| rule.apply(line).map(|text| (index, text)));

            match patched {
                Some((index, text)) => {
                    trace!(line = number + 1, rule = index, "patched line");
                    matches[index] += 1;
                    output.push_str(&text);
                }
                None => output.push_str(line),
            }
            output.push_str(ending);
        }

        (output, matches)
    }

    /// Applies the rules to the file and replaces it atomically.
    ///
    /// # Errors
    ///
    /// - `SanitizeError::Io` if the file cannot be read (including non-UTF-8
    ///   content) or replaced.
    /// - `SanitizeError::PatchValidation` if any rule never matched; the file
    ///   is left byte-for-byte unchanged.
    pub fn apply(&self) -> Result<PatchReport, SanitizeError> {
        let input =
            std::fs::read_to_string(&self.path).map_err(|e| SanitizeError::io(&self.path, e))?;
        let (output, matches) = self.patch_str(&input);

        let unmatched: Vec<String> = self
            .rules
            .iter()
            .zip(&matches)
            .filter(|(_, count)| **count == 0)
            .map(|(rule, _)| rule.to_string())
            .collect();

        if !unmatched.is_empty() {
            return Err(SanitizeError::PatchValidation {
                path: self.path.clone(),
                unmatched,
            });
        }

        atomic_write(&self.path, output.as_bytes())?;

        let report = PatchReport {
            path: self.path.clone(),
            matches,
        };
        debug!(
            file = %self.path.display(),
            rules = self.rules.len(),
            lines = report.lines_changed(),
            "patched file"
        );
        Ok(report)
    }
}

/// Applies `rules` to the file at `path`. See [`PatchSet::apply`].
///
/// # Errors
///
/// Same as [`PatchSet::apply`].
pub fn replace_file_lines(
    path: impl Into<PathBuf>,
    rules: impl IntoIterator<Item = PatchRule>,
) -> Result<PatchReport, SanitizeError> {
    rules
        .into_iter()
        .fold(PatchSet::new(path), PatchSet::rule)
        .apply()
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}
