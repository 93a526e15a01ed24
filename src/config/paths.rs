// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! workspace/                      (default: ..)
//!   mopub-unity/                  private_repo
//!     scripts/build.sh            package_build_script
//!     scripts/*-build.sh          android/ios_build_script
//!     unity-sample-app/.../ProjectSettings.asset
//!   mopub-unity-sdk/              public_repo
//! ```
//!
//! Paths inside the private repository are resolved against `private_repo`,
//! the repositories themselves against `workspace`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Repository and file locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding both repositories as siblings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,
    /// Private repository (default: workspace/mopub-unity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_repo: Option<PathBuf>,
    /// Public mirror (default: workspace/mopub-unity-sdk).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_repo: Option<PathBuf>,
    /// Android native build script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_build_script: Option<PathBuf>,
    /// iOS native build script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_build_script: Option<PathBuf>,
    /// Script building the wrappers and exporting the Unity package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_build_script: Option<PathBuf>,
    /// Sample app `ProjectSettings.asset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_settings: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve relative paths and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace cannot be made absolute.
    pub fn resolve(&mut self) -> Result<()> {
        let workspace = self
            .workspace
            .clone()
            .unwrap_or_else(|| PathBuf::from(".."));
        let workspace = std::path::absolute(&workspace).map_err(|e| ConfigError::InvalidValue {
            section: "paths".to_string(),
            key: "workspace".to_string(),
            message: e.to_string(),
        })?;

        let resolve = |path: &mut Option<PathBuf>, parent: &Path, default: &str| match path {
            Some(p) if p.is_relative() => {
                *path = Some(parent.join(p.clone()));
            }
            None => {
                *path = Some(parent.join(default));
            }
            _ => {}
        };

        resolve(&mut self.private_repo, &workspace, "mopub-unity");
        resolve(&mut self.public_repo, &workspace, "mopub-unity-sdk");

        let private = self
            .private_repo
            .clone()
            .unwrap_or_else(|| workspace.join("mopub-unity"));

        resolve(
            &mut self.android_build_script,
            &private,
            "scripts/mopub-android-sdk-unity-build.sh",
        );
        resolve(
            &mut self.ios_build_script,
            &private,
            "scripts/mopub-ios-sdk-unity-build.sh",
        );
        resolve(&mut self.package_build_script, &private, "scripts/build.sh");
        resolve(
            &mut self.project_settings,
            &private,
            "unity-sample-app/ProjectSettings/ProjectSettings.asset",
        );

        self.workspace = Some(workspace);
        Ok(())
    }

    /// Get the private repository path.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if paths were never resolved.
    pub fn private_repo(&self) -> Result<&Path> {
        required(self.private_repo.as_deref(), "private_repo")
    }

    /// Get the public repository path.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if paths were never resolved.
    pub fn public_repo(&self) -> Result<&Path> {
        required(self.public_repo.as_deref(), "public_repo")
    }

    /// Get both native build script paths (Android first).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if paths were never resolved.
    pub fn native_build_scripts(&self) -> Result<[&Path; 2]> {
        Ok([
            required(self.android_build_script.as_deref(), "android_build_script")?,
            required(self.ios_build_script.as_deref(), "ios_build_script")?,
        ])
    }

    /// Get the package build script path.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if paths were never resolved.
    pub fn package_build_script(&self) -> Result<&Path> {
        required(self.package_build_script.as_deref(), "package_build_script")
    }

    /// Get the sample app project settings path.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if paths were never resolved.
    pub fn project_settings(&self) -> Result<&Path> {
        required(self.project_settings.as_deref(), "project_settings")
    }
}

fn required<'a>(path: Option<&'a Path>, key: &str) -> Result<&'a Path> {
    path.ok_or_else(|| {
        ConfigError::MissingKey {
            section: "paths".to_string(),
            key: key.to_string(),
        }
        .into()
    })
}
