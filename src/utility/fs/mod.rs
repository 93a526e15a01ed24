// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem traversal.
//!
//! ```text
//! walk:  walk_files()      ignore::WalkParallel, sorted result
//!        find_files()      wax glob over paths relative to root
//!        WalkOptions       max_depth, hidden, gitignore, skip_dirs
//! copy:  copy_dir_all()    recursive tokio::fs copy, symlinks kept
//!        replace_dir()     remove then copy
//! ```

pub mod copy;
pub mod walk;
