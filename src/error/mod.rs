// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            ReleaseError (~24 bytes)
//!                     |
//!   +------+------+------+------+------+
//!   |      |      |      |      |      |
//!   v      v      v      v      v      v
//!  Git    Cfg  Sanitize Proc  Version  Io
//!  Box    Box    Box    Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Git       Gix, CommandFailed, BranchExists, NoBranchName
//!   Config    ParseError, MissingKey, InvalidValue
//!   Sanitize  PatchValidation, InvalidPattern, Io
//!   Process   SpawnFailed, NonZeroExit, Timeout
//!   Version   InvalidFormat
//!
//! All variants boxed => ReleaseError fits in 24 bytes.
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ReleaseError`].
pub type ReleaseResult<T> = std::result::Result<T, ReleaseError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// File sanitization error.
    #[error("sanitize error: {0}")]
    Sanitize(#[from] Box<SanitizeError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Release version error.
    #[error("version error: {0}")]
    Version(#[from] Box<VersionError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ReleaseError {
                fn from(err: $error) -> Self {
                    ReleaseError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    SanitizeError => Sanitize,
    ProcessError => Process,
    VersionError => Version,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Failed to resolve HEAD to a commit id.
    #[error("failed to resolve head: {0}")]
    HeadId(#[from] Box<gix::reference::head_id::Error>),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// A release branch with this name is already published.
    #[error("release branch {branch} exists on the {remote} remote")]
    BranchExists { branch: String, remote: String },

    /// A step that must run on a branch was given none.
    #[error("branch name not supplied for step '{step}'")]
    NoBranchName { step: String },

    /// Path is not valid UTF-8 and cannot be passed to git.
    #[error("invalid path for git: {0}")]
    InvalidPath(PathBuf),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Sanitize Errors ---

/// Errors raised while rewriting files before publication.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// One or more patch rules never matched a line of the target file.
    ///
    /// The target file is left untouched.
    #[error("didn't find all provided patterns in {}:\n\t{}", path.display(), unmatched.join("\n\t"))]
    PatchValidation {
        path: PathBuf,
        unmatched: Vec<String>,
    },

    /// A line pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// I/O error on a file being rewritten.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SanitizeError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with an unexpected status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

// --- Version Errors ---

/// Release version errors.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Version string does not look like `MAJOR.MINOR.PATCH[+-suffix]`.
    #[error(
        "string {0} does not match the version string pattern!\nValid examples:\n\t3.1.1\n\t3.1.1-kit\n\t3.1.1+kit"
    )]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests;
