// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning for build scripts and file mirroring.
//!
//! ```text
//! ProcessBuilder::new("rsync")
//!   .args() .cwd() .env() .flags() .timeout()
//!   .run().await
//!       --> tokio::process::Command
//!           stdout/stderr reader tasks (log and/or keep)
//!           wait, or kill on timeout
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod runner;


pub use builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
