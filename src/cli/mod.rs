// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for unity-release using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! unity-release [global options] <command>
//! version
//! options
//! inis
//! internal-candidate <VERSION> [--release-hash H] [--test]
//! candidate <VERSION> [--release-hash H] [--test]
//! promote <VERSION>
//! strip [PATH]
//! ```

pub mod global;
pub mod release;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::release::{CandidateArgs, PromoteArgs, StripArgs};
use clap::{Parser, Subcommand};

/// Unity SDK Release Tool
///
/// Creates release candidate branches in the private repository and
/// publishes them to the public mirror.
#[derive(Debug, Parser)]
#[command(
    name = "unity-release",
    author,
    version,
    about = "Unity SDK Release Tool",
    long_about = "unity-release Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Creates, tests, and publishes tagged release branches of the\n\
                  Unity SDK. Both repositories must be checked out as siblings\n\
                  in the same workspace directory.",
    after_help = "CONFIGURATION:\n\n\
                  Options are read from `release.toml` in the current directory\n\
                  if present, then from every --ini file in order, then from\n\
                  RELEASE_<SECTION>__<KEY> environment variables, and finally\n\
                  from --set and the other command-line flags. Use `options` to\n\
                  print the resolved values."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their resolved values.
    Options,

    /// Lists the configuration layers in load order.
    Inis,

    /// Creates a release candidate built from the latest internal SDKs.
    ///
    /// Unlike `candidate`, does not cherry-pick to main, switch the build
    /// scripts to the public SDKs or remove any internal code.
    #[command(name = "internal-candidate")]
    InternalCandidate(CandidateArgs),

    /// Creates a tagged release candidate branch in the private repository.
    Candidate(CandidateArgs),

    /// Publishes a tagged release candidate to the public repository.
    Promote(PromoteArgs),

    /// Removes private lines from source files under a directory.
    Strip(StripArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
