// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command};
use clap::Parser;

#[test]
fn test_parse_version_command() {
    let cli = Cli::try_parse_from(["unity-release", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_candidate() {
    let cli = Cli::try_parse_from([
        "unity-release",
        "candidate",
        "5.13.1",
        "--release-hash",
        "abc123",
        "--test",
    ])
    .unwrap();

    let Some(Command::Candidate(args)) = cli.command else {
        panic!("expected candidate command");
    };
    assert_eq!(args.version.as_str(), "5.13.1");
    assert_eq!(args.release_hash.as_deref(), Some("abc123"));
    assert!(args.test);
}

#[test]
fn test_parse_internal_candidate_underscore_alias() {
    let cli = Cli::try_parse_from([
        "unity-release",
        "internal-candidate",
        "5.13.1-kit",
        "--release_hash",
        "abc123",
    ])
    .unwrap();

    let Some(Command::InternalCandidate(args)) = cli.command else {
        panic!("expected internal-candidate command");
    };
    assert_eq!(args.version.branch_name(true), "internal-release-5.13.1-kit");
    assert!(!args.test);
}

#[test]
fn test_parse_rejects_bad_version() {
    let err = Cli::try_parse_from(["unity-release", "promote", "5.13"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("does not match the version string pattern"));
    assert!(message.contains("3.1.1+kit"));
}

#[test]
fn test_parse_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "unity-release",
        "-l",
        "5",
        "promote",
        "5.13.1",
        "--dry",
        "--yes",
        "--set",
        "git.main_branch=main",
    ])
    .unwrap();

    assert!(cli.global.dry);
    assert!(cli.global.yes);
    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "git.main_branch=main",
        "global.output_log_level=5",
        "global.file_log_level=5",
        "global.dry=true",
    ]
    "#);
}

#[test]
fn test_parse_strip_default_path() {
    let cli = Cli::try_parse_from(["unity-release", "strip"]).unwrap();
    let Some(Command::Strip(args)) = cli.command else {
        panic!("expected strip command");
    };
    assert!(args.path.is_none());
}

#[test]
fn test_file_log_level_overrides_console_level() {
    let cli = Cli::try_parse_from([
        "unity-release",
        "--log-level",
        "2",
        "--file-log-level",
        "6",
        "--log-file",
        "release.log",
        "--json-log",
        "options",
    ])
    .unwrap();

    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "global.output_log_level=2",
        "global.file_log_level=6",
        "global.log_file=release.log",
        "global.json_log=true",
    ]
    "#);
}
