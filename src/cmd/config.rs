// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `inis`.

use crate::config::Config;
use crate::config::loader::ConfigLoader;

/// Prints every option with its resolved value.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Prints the configuration layers in load order, flagging when no file
/// was found.
pub fn run_inis_command(loader: &ConfigLoader) {
    if loader.loaded_files().is_empty() {
        println!("No configuration files loaded");
    }
    for line in loader.format_sources() {
        println!("{line}");
    }
}
