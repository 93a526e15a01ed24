// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Standalone private line stripping.

use std::path::Path;

use tracing::info;

use crate::cli::release::StripArgs;
use crate::cmd::release::confirm;
use crate::config::Config;
use crate::error::Result;
use crate::sanitize::{StripRule, StripSummary, process_directory};

/// Handler for `strip`.
///
/// # Errors
///
/// Returns an error if the marker does not compile, the directory cannot be
/// walked, or a file cannot be rewritten.
pub fn run_strip_command(args: &StripArgs, config: &Config, assume_yes: bool) -> Result<()> {
    let root = match &args.path {
        Some(path) => path.as_path(),
        None => config.paths.private_repo()?,
    };
    confirm(
        &format!(
            "This will delete lines matching '{}' from every '*{}' file under {}.",
            config.sanitize.private_marker,
            config.sanitize.suffix,
            root.display()
        ),
        assume_yes,
    )?;
    strip_directory(root, config).map(drop)
}

/// Strips `root` with the configured marker and suffix.
///
/// # Errors
///
/// Same as [`run_strip_command`].
pub fn strip_directory(root: &Path, config: &Config) -> Result<StripSummary> {
    let rule = StripRule::new(&config.sanitize.private_marker, config.sanitize.suffix.clone())?;
    if config.global.dry {
        info!(root = %root.display(), "dry run: strip private lines");
        return Ok(StripSummary::default());
    }
    process_directory(root, &rule)
}
