// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release version strings.
//!
//! ```text
//! 5.13.1-kit
//! | |  | '-- suffix (optional, `+` or `-`)
//! | |  '---- patch
//! | '------- minor
//! '--------- major
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::VersionError;

fn version_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)([+-]\w+)?$").ok())
        .as_ref()
}

/// A validated `MAJOR.MINOR.PATCH[+-suffix]` version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    text: String,
    major: String,
    minor: String,
    patch: String,
}

impl ReleaseVersion {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric bundle code shared by the iOS and Android sample apps.
    ///
    /// Major, minor and patch are concatenated as text. A single-digit minor
    /// gets a trailing `0` so codes keep increasing past minor version 9.
    #[must_use]
    pub fn bundle_code(&self) -> String {
        let minor = if self.minor.len() == 1 {
            format!("{}0", self.minor)
        } else {
            self.minor.clone()
        };
        format!("{}{minor}{}", self.major, self.patch)
    }

    /// `release-<v>` or `internal-release-<v>`.
    #[must_use]
    pub fn branch_name(&self, internal: bool) -> String {
        let prefix = if internal { "internal-" } else { "" };
        format!("{prefix}release-{}", self.text)
    }

    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.text)
    }
}

impl FromStr for ReleaseVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::InvalidFormat(s.to_string());
        let caps = version_pattern()
            .and_then(|re| re.captures(s))
            .ok_or_else(invalid)?;
        let part = |i: usize| caps.get(i).map(|m| m.as_str().to_string()).ok_or_else(invalid);

        Ok(Self {
            text: s.to_string(),
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
