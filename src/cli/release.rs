// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release command arguments.
//!
//! ```text
//! internal-candidate <VERSION> [--release-hash H] [--test]
//! candidate          <VERSION> [--release-hash H] [--test]
//! promote            <VERSION>
//! strip              [PATH]
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::cmd::release::version::ReleaseVersion;

/// Arguments for `candidate` and `internal-candidate`.
#[derive(Debug, Clone, Args)]
pub struct CandidateArgs {
    /// The release version. Format is like '3.5.2' or '3.5.2-kit'.
    #[arg(value_name = "VERSION")]
    pub version: ReleaseVersion,

    /// The git hash of the commit to base the release off of.
    #[arg(long = "release-hash", alias = "release_hash", value_name = "HASH")]
    pub release_hash: Option<String>,

    /// Suppresses cherry picks and pushes to the remote.
    #[arg(long)]
    pub test: bool,
}

/// Arguments for `promote`.
#[derive(Debug, Clone, Args)]
pub struct PromoteArgs {
    /// The candidate version to publish.
    #[arg(value_name = "VERSION")]
    pub version: ReleaseVersion,
}

/// Arguments for `strip`.
#[derive(Debug, Clone, Default, Args)]
pub struct StripArgs {
    /// Directory to strip (default: the private repository).
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}
