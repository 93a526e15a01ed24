// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!              Repo { path, dry_run }
//!                 |               |
//!             query.rs         cmd.rs
//!                 \               /
//!                  v             v
//!             ,--------------------,
//!             |  backend (traits)  |
//!             '---+------------+---'
//!                 |            |
//!                 v            v
//!             GitQuery    GitMutation
//!           (gix, read)   (CLI, write)
//!                 |            |
//!                 v            v
//!            GixBackend   ShellBackend
//!            .is_repo     .checkout/-b
//!            .branch      .commit/.tag
//!            .head        .push/.pull
//!            .uncommit    .cherry_pick
//!                         .submodule
//!                         .ls-remote
//! ```
//!
//! **`GixBackend`** reads repository state in-process.
//! **`ShellBackend`** runs the git CLI for everything that writes or talks
//! to a remote. `Repo` skips mutations in dry-run mode.

pub mod backend;
pub mod cmd;
pub mod query;
pub mod repo;

pub use repo::Repo;
