// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for line patching and private line stripping over real
//! directory trees.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use unity_release::config::Config;
use unity_release::error::SanitizeError;
use unity_release::sanitize::{
    DEFAULT_PRIVATE_MARKER, PatchRule, StripRule, process_directory, replace_file_lines,
};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

// =============================================================================
// Patching
// =============================================================================

#[test]
fn patch_keeps_untouched_lines_and_crlf() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "build.sh",
        "#!/bin/bash\r\n: \"${INTERNAL_SDK:=true}\"\r\necho done\r\n",
    );

    let report = replace_file_lines(
        temp.path().join("build.sh"),
        [PatchRule::literal(r":.*INTERNAL_SDK:=.*", r#": "${INTERNAL_SDK:=false}""#).unwrap()],
    )
    .unwrap();

    assert_eq!(report.matches(), [1]);
    assert_eq!(
        read(temp.path(), "build.sh"),
        "#!/bin/bash\r\n: \"${INTERNAL_SDK:=false}\"\r\necho done\r\n"
    );
}

#[test]
fn patch_with_capture_template() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "Settings.asset", "  version: 1.0\n  name: app\n");

    let report = replace_file_lines(
        temp.path().join("Settings.asset"),
        [
            PatchRule::template(r"^(\s*version: ).*", "${1}2.0").unwrap(),
            PatchRule::template(r"^(\s*name: )(\w+)", "${1}${2}-public").unwrap(),
        ],
    )
    .unwrap();

    assert_eq!(report.lines_changed(), 2);
    assert_eq!(
        read(temp.path(), "Settings.asset"),
        "  version: 2.0\n  name: app-public\n"
    );
}

#[test]
fn patch_unmatched_rule_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let original = "  bundleVersion: 1.0.0\n";
    write(temp.path(), "ProjectSettings.asset", original);

    let err = replace_file_lines(
        temp.path().join("ProjectSettings.asset"),
        [
            PatchRule::literal(r"  bundleVersion: .*", "  bundleVersion: 2.0.0").unwrap(),
            PatchRule::literal(r"    iOS: \d+", "    iOS: 200").unwrap(),
        ],
    )
    .unwrap_err();

    let SanitizeError::PatchValidation { unmatched, .. } = &err else {
        panic!("expected PatchValidation, got {err:?}");
    };
    assert_eq!(unmatched.len(), 1);
    assert!(unmatched[0].contains(r"iOS: \d+"));
    assert_eq!(read(temp.path(), "ProjectSettings.asset"), original);
}

#[test]
fn patch_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = replace_file_lines(
        temp.path().join("absent.asset"),
        [PatchRule::literal("x", "y").unwrap()],
    )
    .unwrap_err();
    assert!(matches!(err, SanitizeError::Io { .. }));
}

// =============================================================================
// Stripping
// =============================================================================

#[test]
fn strip_tree_only_touches_matching_suffix() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "Assets/MoPub.cs",
        "class MoPub {\n    // TODO: internal only\n    void Init() {}\n  * todo remove\n}\n",
    );
    write(root, "Assets/Editor/Menu.cs", "// nothing private here\n");
    write(root, "Assets/Notes.txt", "// TODO keep, not a source file\n");
    write(root, ".hidden/Secret.cs", "//TODO hidden\nclass Secret {}\n");

    let rule = StripRule::new(DEFAULT_PRIVATE_MARKER, ".cs").unwrap();
    let summary = process_directory(root, &rule).unwrap();

    assert_eq!(summary.files_visited, 3);
    assert_eq!(summary.files_changed, 2);
    assert_eq!(summary.lines_removed, 3);
    assert_eq!(
        read(root, "Assets/MoPub.cs"),
        "class MoPub {\n    void Init() {}\n}\n"
    );
    assert_eq!(read(root, "Assets/Editor/Menu.cs"), "// nothing private here\n");
    assert_eq!(read(root, "Assets/Notes.txt"), "// TODO keep, not a source file\n");
    assert_eq!(read(root, ".hidden/Secret.cs"), "class Secret {}\n");
}

#[test]
fn strip_directory_honours_dry_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "A.cs", "// TODO private\nclass A {}\n");

    let config = Config::parse("[global]\ndry = true\n").unwrap();
    unity_release::cmd::strip::strip_directory(root, &config).unwrap();

    assert_eq!(read(root, "A.cs"), "// TODO private\nclass A {}\n");
}

#[test]
fn strip_missing_root_fails() {
    let temp = TempDir::new().unwrap();
    let rule = StripRule::new(DEFAULT_PRIVATE_MARKER, ".cs").unwrap();
    assert!(process_directory(&temp.path().join("absent"), &rule).is_err());
}
