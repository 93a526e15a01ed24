// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-based file rewriting used before code goes public.
//!
//! ```text
//! patch   PatchSet (file + ordered PatchRules)
//!           per line: first matching rule wins, replace_all
//!           every rule must fire somewhere, else PatchValidation
//! strip   StripRule (marker regex + file suffix)
//!           drop matching lines, keep everything else byte-exact
//! atomic  sibling temp file --> persist (rename) over original
//! ```
//!
//! Neither engine is safe to run concurrently against the same file.

pub mod atomic;
pub mod patch;
pub mod strip;

#[cfg(test)]
mod tests;

pub use patch::{PatchReport, PatchRule, PatchSet, Replacement, replace_file_lines};
pub use strip::{DEFAULT_PRIVATE_MARKER, StripRule, StripSummary, process_directory, strip_file};
