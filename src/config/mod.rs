// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for unity-release.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. release.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. RELEASE_* env vars
//! 5. --set section.key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! RELEASE_GLOBAL__DRY=true          → global.dry = true
//! RELEASE_PATHS__WORKSPACE=/src     → paths.workspace = "/src"
//! RELEASE_GIT__MAIN_BRANCH=main     → git.main_branch = "main"
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{GitConfig, GlobalConfig, PublishConfig, SanitizeConfig, SubmodulesConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Repository and file locations.
    pub paths: PathsConfig,
    /// Remote and branch conventions.
    pub git: GitConfig,
    /// Native SDK submodules.
    pub submodules: SubmodulesConfig,
    /// Sanitization rules.
    pub sanitize: SanitizeConfig,
    /// Public mirror cleanup.
    pub publish: PublishConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unity_release::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("release.toml")
    ///     .with_env_prefix("RELEASE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails, the private marker is not a
    /// valid regex, or the strip suffix is empty.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve()?;

        if let Err(e) = regex::Regex::new(&self.sanitize.private_marker) {
            return Err(ConfigError::InvalidValue {
                section: "sanitize".to_string(),
                key: "private_marker".to_string(),
                message: e.to_string(),
            }
            .into());
        }

        if self.sanitize.suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "sanitize".to_string(),
                key: "suffix".to_string(),
                message: "suffix must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_release_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.json_log".into(), self.global.json_log.to_string());
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        let paths = &self.paths;
        for (key, value) in [
            ("paths.workspace", &paths.workspace),
            ("paths.private_repo", &paths.private_repo),
            ("paths.public_repo", &paths.public_repo),
            ("paths.android_build_script", &paths.android_build_script),
            ("paths.ios_build_script", &paths.ios_build_script),
            ("paths.package_build_script", &paths.package_build_script),
            ("paths.project_settings", &paths.project_settings),
        ] {
            options.insert(
                key.into(),
                value
                    .as_ref()
                    .map_or_else(String::new, |p| p.display().to_string()),
            );
        }
    }

    fn format_release_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.remote".into(), self.git.remote.clone());
        options.insert("git.main_branch".into(), self.git.main_branch.clone());
        options.insert(
            "submodules.external".into(),
            self.submodules.external.join(", "),
        );
        options.insert(
            "submodules.internal".into(),
            self.submodules.internal.join(", "),
        );
        options.insert(
            "sanitize.private_marker".into(),
            self.sanitize.private_marker.clone(),
        );
        options.insert("sanitize.suffix".into(), self.sanitize.suffix.clone());
        options.insert(
            "sanitize.stripped_defines".into(),
            self.sanitize.stripped_defines.join(", "),
        );
        options.insert(
            "publish.private_dirs".into(),
            self.publish
                .private_dirs
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        options.insert(
            "publish.artifact_globs".into(),
            self.publish.artifact_globs.join(", "),
        );
    }
}
