// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{
    DEFAULT_PRIVATE_MARKER, PatchRule, PatchSet, Replacement, StripRule, StripSummary,
    process_directory, replace_file_lines, strip_file,
};
use crate::error::SanitizeError;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn default_rule() -> StripRule {
    StripRule::new(DEFAULT_PRIVATE_MARKER, ".cs").unwrap()
}

// --- patch ---

#[test]
fn test_patch_bundle_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "ProjectSettings.asset",
        "PlayerSettings:\n  bundleVersion: 1.0.0\n  productName: sample\n",
    );

    let report = replace_file_lines(
        &path,
        [PatchRule::template(r"  bundleVersion: .*", "  bundleVersion: 2.0.0").unwrap()],
    )
    .unwrap();

    assert_eq!(report.matches(), [1]);
    assert_eq!(
        read(&path),
        "PlayerSettings:\n  bundleVersion: 2.0.0\n  productName: sample\n"
    );
}

#[test]
fn test_patch_only_touches_substituted_lines() {
    let dir = tempfile::tempdir().unwrap();
    let original = "a: 1\nb: 2\nc: 3\nb: 4\nno newline at end";
    let path = write(&dir, "settings.txt", original);

    let report = PatchSet::new(&path)
        .rule(PatchRule::template(r"^b: (\d)", "b: ${1}0").unwrap())
        .rule(PatchRule::template("end$", "END").unwrap())
        .apply()
        .unwrap();

    assert_eq!(report.matches(), [2, 1]);
    assert_eq!(report.lines_changed(), 3);
    assert_eq!(read(&path), "a: 1\nb: 20\nc: 3\nb: 40\nno newline at END");
}

#[test]
fn test_patch_replaces_every_occurrence_in_line() {
    let set = PatchSet::new("unused").rule(PatchRule::template("x", "y").unwrap());
    let (output, matches) = set.patch_str("x-x-x\nz\n");
    assert_eq!(output, "y-y-y\nz\n");
    assert_eq!(matches, [1]);
}

#[test]
fn test_patch_failure_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let original = "  bundleVersion: 1.0.0\r\nAndroidBundleVersionCode: 7\r\n";
    let path = write(&dir, "ProjectSettings.asset", original);

    let err = PatchSet::new(&path)
        .rule(PatchRule::template(r"  bundleVersion: .*", "  bundleVersion: 2.0.0").unwrap())
        .rule(PatchRule::template(r"    iOS: \d+", "    iOS: 510").unwrap())
        .apply()
        .unwrap_err();

    match &err {
        SanitizeError::PatchValidation { unmatched, .. } => {
            assert_eq!(unmatched, &[r"pattern:     iOS: \d+ replacement:     iOS: 510"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read(&path).unwrap(), original.as_bytes());

    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1, "temporary file must not survive a failed patch");
}

#[test]
fn test_patch_reapplied_rules_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "build.sh", "INTERNAL_SDK:=true\n");

    let rules = || [PatchRule::template("^INTERNAL_SDK:=true$", "INTERNAL_SDK:=false").unwrap()];

    replace_file_lines(&path, rules()).unwrap();
    let patched = read(&path);

    let err = replace_file_lines(&path, rules()).unwrap_err();
    assert!(matches!(err, SanitizeError::PatchValidation { .. }));
    assert_eq!(read(&path), patched);
}

#[test]
fn test_patch_first_matching_rule_shadows_later_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "shadow.txt", "a\nb\n");

    let err = PatchSet::new(&path)
        .rule(PatchRule::template("a", "a").unwrap())
        .rule(PatchRule::template("a", "c").unwrap())
        .apply()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "didn't find all provided patterns in {}:\n\tpattern: a replacement: c",
            path.display()
        )
    );
    assert_eq!(read(&path), "a\nb\n");
}

#[test]
fn test_patch_preserves_crlf() {
    let set = PatchSet::new("unused").rule(PatchRule::template("^value: .*$", "value: new").unwrap());
    let (output, matches) = set.patch_str("key: k\r\nvalue: old\r\n");
    assert_eq!(output, "key: k\r\nvalue: new\r\n");
    assert_eq!(matches, [1]);
}

#[test]
fn test_patch_literal_replacement_keeps_dollar() {
    let set = PatchSet::new("unused").rule(PatchRule::new(
        regex::Regex::new("^INTERNAL_SDK:=.*$").unwrap(),
        Replacement::literal(r#": "${INTERNAL_SDK:=false}""#),
    ));
    let (output, _) = set.patch_str("INTERNAL_SDK:=true\n");
    assert_eq!(output, ": \"${INTERNAL_SDK:=false}\"\n");
}

#[test]
fn test_patch_function_replacement() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "defines.txt", "  scriptingDefineSymbols:\n    1: a;secret;b\n");

    let rule = PatchRule::with_fn(r"(\s*\d+:\s*)(.*)", |caps| {
        let kept: Vec<&str> = caps[2].split(';').filter(|s| *s != "secret").collect();
        format!("{}{}", &caps[1], kept.join(";"))
    })
    .unwrap();
    assert_eq!(
        rule.to_string(),
        r"pattern: (\s*\d+:\s*)(.*) replacement: <function>"
    );

    replace_file_lines(&path, [rule]).unwrap();
    assert_eq!(read(&path), "  scriptingDefineSymbols:\n    1: a;b\n");
}

#[test]
fn test_patch_invalid_pattern() {
    let err = PatchRule::template("(unclosed", "x").unwrap_err();
    assert!(matches!(err, SanitizeError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
}

#[test]
fn test_patch_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = replace_file_lines(
        dir.path().join("missing.asset"),
        [PatchRule::template("a", "b").unwrap()],
    )
    .unwrap_err();
    assert!(matches!(err, SanitizeError::Io { .. }));
}

#[cfg(unix)]
#[test]
fn test_patch_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "build.sh", "#!/bin/sh\nINTERNAL_SDK:=true\n");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    replace_file_lines(&path, [PatchRule::template("true", "false").unwrap()]).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

// --- strip ---

#[test]
fn test_strip_todo_lines_from_cs_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "Foo.cs",
        "// TODO fix this\n//NOTTODO keep\nclass Foo {}\n",
    );

    let removed = strip_file(&path, &default_rule()).unwrap();

    assert_eq!(removed, 1);
    assert_eq!(read(&path), "//NOTTODO keep\nclass Foo {}\n");
}

#[test]
fn test_strip_marker_variants() {
    let rule = default_rule();
    let input = "\t// todo lower\n    * TODO doc\n*TODO tight\n//TODO tight\nint x; // TODO trailing\n/* TODO */\n";
    let (output, removed) = rule.strip_bytes(input.as_bytes());

    assert_eq!(removed, 4);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "int x; // TODO trailing\n/* TODO */\n"
    );
}

#[test]
fn test_strip_preserves_line_endings_and_last_line() {
    let rule = default_rule();
    let (output, removed) = rule.strip_bytes(b"a\r\n// TODO x\r\nb\r\nc");
    assert_eq!(removed, 1);
    assert_eq!(output, b"a\r\nb\r\nc");
}

#[test]
fn test_strip_unanchored_pattern_is_anchored() {
    let rule = StripRule::new("secret", ".cs").unwrap();
    assert!(rule.is_private(b"SECRET key\n"));
    assert!(!rule.is_private(b"not secret\n"));
}

#[test]
fn test_strip_keeps_invalid_utf8_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Latin1.cs");
    std::fs::write(&path, b"caf\xe9\n// TODO drop\n").unwrap();

    assert_eq!(strip_file(&path, &default_rule()).unwrap(), 1);
    assert_eq!(std::fs::read(&path).unwrap(), b"caf\xe9\n");
}

#[test]
fn test_process_directory_filters_by_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let cs = write(&dir, "Scripts/Foo.cs", "// TODO fix this\nclass Foo {}\n");
    let clean = write(&dir, "Scripts/Bar.cs", "class Bar {}\n");
    let hidden = write(&dir, ".internal/Baz.cs", " * todo: hidden\nclass Baz {}\n");
    let txt = write(&dir, "notes.txt", "// TODO keep, wrong suffix\n");
    let meta = write(&dir, "Scripts/Foo.cs.meta", "// TODO keep\n");

    let summary = process_directory(dir.path(), &default_rule()).unwrap();

    assert_eq!(
        summary,
        StripSummary {
            files_visited: 3,
            files_changed: 2,
            lines_removed: 2,
        }
    );
    assert_eq!(read(&cs), "class Foo {}\n");
    assert_eq!(read(&clean), "class Bar {}\n");
    assert_eq!(read(&hidden), "class Baz {}\n");
    assert_eq!(read(&txt), "// TODO keep, wrong suffix\n");
    assert_eq!(read(&meta), "// TODO keep\n");
}

#[test]
fn test_process_directory_skips_git_dir() {
    let dir = tempfile::tempdir().unwrap();
    let inside_git = write(&dir, ".git/hooks/Hook.cs", "// TODO keep\n");

    let summary = process_directory(dir.path(), &default_rule()).unwrap();

    assert_eq!(summary.files_visited, 0);
    assert_eq!(read(&inside_git), "// TODO keep\n");
}

#[test]
fn test_process_directory_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    assert!(process_directory(&dir.path().join("missing"), &default_rule()).is_err());
}

#[test]
fn test_strip_end_anchored_marker_ignores_line_ending() {
    let rule = StripRule::new(r"\s*//\s*PRIVATE$", ".cs").unwrap();
    let (output, removed) = rule.strip_bytes(b"// PRIVATE\nkeep\n  // private\r\n// PRIVATE but not alone\n");

    assert_eq!(removed, 2);
    assert_eq!(output, b"keep\n// PRIVATE but not alone\n");
}

#[test]
fn test_strip_alternatives_all_anchored() {
    let rule = StripRule::new(r"^// internal|secret", ".cs").unwrap();
    assert!(rule.is_private(b"// internal api\n"));
    assert!(rule.is_private(b"Secret = 1;\n"));
    assert!(!rule.is_private(b"int secret = 1;\n"));
}

#[cfg(unix)]
#[test]
fn test_process_directory_strips_symlinked_file_target() {
    let shared = tempfile::tempdir().unwrap();
    let target = write(&shared, "Shared.cs", "// TODO secret\nclass A {}\n");
    let dir = tempfile::tempdir().unwrap();
    let link = dir.path().join("Link.cs");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let summary = process_directory(dir.path(), &default_rule()).unwrap();

    assert_eq!(
        summary,
        StripSummary {
            files_visited: 1,
            files_changed: 1,
            lines_removed: 1,
        }
    );
    assert_eq!(read(&target), "class A {}\n");
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(read(&link), "class A {}\n");
}

#[cfg(unix)]
#[test]
fn test_patch_through_symlink_keeps_link() {
    let dir = tempfile::tempdir().unwrap();
    let target = write(&dir, "real/build.sh", ": \"${INTERNAL_SDK:=true}\"\n");
    let link = dir.path().join("build.sh");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    replace_file_lines(
        &link,
        [PatchRule::literal(r":.*INTERNAL_SDK:=.*", r#": "${INTERNAL_SDK:=false}""#).unwrap()],
    )
    .unwrap();

    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(read(&target), ": \"${INTERNAL_SDK:=false}\"\n");
}
