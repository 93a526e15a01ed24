// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for unity-release.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, GitConfig,
//!         SubmodulesConfig, SanitizeConfig, PublishConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log mutating git and filesystem operations instead of running them.
    pub dry: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file log when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub json_log: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            json_log: false,
        }
    }
}

/// Git conventions shared by both repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Remote that release branches and tags are pushed to.
    pub remote: String,
    /// Long-lived integration branch.
    pub main_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            main_branch: "master".to_string(),
        }
    }
}

/// Native SDK submodules of the private repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmodulesConfig {
    /// Public SDK checkouts, shipped with the release.
    pub external: Vec<String>,
    /// Internal SDK checkouts, removed before publication.
    pub internal: Vec<String>,
}

impl Default for SubmodulesConfig {
    fn default() -> Self {
        Self {
            external: vec!["mopub-android-sdk".to_string(), "mopub-ios-sdk".to_string()],
            internal: vec!["mopub-android".to_string(), "mopub-ios".to_string()],
        }
    }
}

/// Rules used to sanitize the private tree before it goes public.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizeConfig {
    /// Lines matching this pattern are deleted (case-insensitive, anchored).
    pub private_marker: String,
    /// Only files whose name ends with this suffix are stripped.
    pub suffix: String,
    /// Scripting define symbols removed from the sample app settings.
    pub stripped_defines: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            private_marker: r"^\s*(//|\*)\s?TODO".to_string(),
            suffix: ".cs".to_string(),
            stripped_defines: vec![
                "mopub_developer".to_string(),
                "mopub_native_beta".to_string(),
                "mopub_build_menu_beta".to_string(),
            ],
        }
    }
}

/// What is removed from the public mirror before the release commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Directories (relative to the public repo) deleted outright.
    pub private_dirs: Vec<PathBuf>,
    /// Glob patterns of build artifacts deleted from the public repo.
    pub artifact_globs: Vec<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            private_dirs: vec![PathBuf::from("scripts/private")],
            artifact_globs: [
                "**/*.aar*",
                "**/unity*.jar",
                "**/chartboost*.jar",
                "**/dagger*.jar",
                "**/javax.inject*.jar",
                "**/vungle*.jar",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
