// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! ConfigLoader::layered(inis, assignments)
//!   = new()
//!     .add_toml_file_optional("release.toml")   [optional]
//!     .add_toml_file(ini) ...                   [ini]
//!     .with_env_prefix("RELEASE")               [env]
//!     .set_assignment("section.key=value") ...  [set]
//!        |
//!        v
//!    build() --> Config (paths resolved, validated)
//! ```
//!
//! Later sources win. Environment variables are applied after every file
//! and before the assignments, whatever order the builder calls come in.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};

use super::Config;
use crate::error::{ConfigError, Result};

/// Optional file read from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "release.toml";
/// Prefix of `RELEASE_<SECTION>__<KEY>` environment overrides.
pub const ENV_PREFIX: &str = "RELEASE";

/// One layer of a [`ConfigLoader`], in the order it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File that existed when it was added; skipped otherwise.
    Optional(PathBuf),
    /// File that must exist.
    Ini(PathBuf),
    /// TOML text passed in directly.
    Inline,
    /// Environment variables under this prefix.
    Env(String),
    /// `section.key=value` override.
    Assignment(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optional(path) => write!(f, "[optional] {}", path.display()),
            Self::Ini(path) => write!(f, "[ini] {}", path.display()),
            Self::Inline => f.write_str("[inline] <string>"),
            Self::Env(prefix) => write!(f, "[env] {prefix}_*"),
            Self::Assignment(assignment) => write!(f, "[set] {assignment}"),
        }
    }
}

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// The loader used by the command line: `release.toml`, then each of
    /// `inis`, then `RELEASE_*`, then `assignments`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for a malformed assignment.
    pub fn layered<I, S>(inis: &[PathBuf], assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let loader = inis
            .iter()
            .fold(Self::new().add_toml_file_optional(LOCAL_CONFIG_FILE), Self::add_toml_file)
            .with_env_prefix(ENV_PREFIX);
        assignments
            .into_iter()
            .try_fold(loader, |loader, assignment| loader.set_assignment(assignment.as_ref()))
    }

    /// Adds a TOML file that must exist when `build()` is called.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push(ConfigSource::Ini(path.to_path_buf()));
        self
    }

    /// Adds a TOML file that is skipped if absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(false));
        if path.exists() {
            self.sources.push(ConfigSource::Optional(path.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(ConfigSource::Inline);
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.sources.push(ConfigSource::Env(prefix.to_string()));
        self
    }

    /// Overrides a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid config path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| ConfigError::InvalidValue {
                section: "cli".to_string(),
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(self)
    }

    /// Applies a `section.key=value` assignment from the command line.
    ///
    /// The value is kept as a string; the `config` crate converts it when the
    /// target field is a number or bool.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if the assignment has no `=` or an
    /// empty key.
    pub fn set_assignment(self, assignment: &str) -> Result<Self> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| ConfigError::InvalidValue {
                section: "cli".to_string(),
                key: "--set".to_string(),
                message: format!("expected 'section.key=value', got '{assignment}'"),
            })?;
        let mut loader = self.set(key, value)?;
        loader
            .sources
            .push(ConfigSource::Assignment(format!("{key}={value}")));
        Ok(loader)
    }

    /// Merges every source and resolves the repository paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or malformed, a value
    /// has the wrong type, an unknown key is present, or validation fails.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let mut config: Config = builder.build()?.try_deserialize()?;
        config.resolve_and_validate()?;
        Ok(config)
    }

    /// Every layer added so far, in order.
    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Files that will be read, in order.
    #[must_use]
    pub fn loaded_files(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter_map(|source| match source {
                ConfigSource::Optional(path) | ConfigSource::Ini(path) => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Numbered lines for the `inis` command.
    #[must_use]
    pub fn format_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
