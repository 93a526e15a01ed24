// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use super::version::ReleaseVersion;
use super::{Release, defines_rule, public_sdk_rule, sample_app_version_rules};
use crate::config::Config;
use crate::error::VersionError;
use crate::sanitize::{PatchRule, PatchSet};

const PROJECT_SETTINGS: &str = "\
PlayerSettings:
  productName: MoPub Sample
  bundleVersion: 5.0.0
  buildNumber:
    iOS: 50000
  AndroidBundleVersionCode: 50000
  scriptingDefineSymbols:
    1: mopub_developer;UNITY_PURCHASING;mopub_native_beta
    4: mopub_build_menu_beta
";

fn patch(input: &str, rules: impl IntoIterator<Item = PatchRule>) -> (String, Vec<usize>) {
    rules
        .into_iter()
        .fold(PatchSet::new("ProjectSettings.asset"), PatchSet::rule)
        .patch_str(input)
}

fn version(s: &str) -> ReleaseVersion {
    s.parse().expect("valid version")
}

// --- version ---

#[test]
fn test_version_accepts_suffixes() {
    for text in ["3.1.1", "3.1.1-kit", "3.1.1+kit", "10.20.30"] {
        assert_eq!(version(text).as_str(), text);
    }
}

#[test]
fn test_version_rejects_malformed() {
    for text in ["3.1", "3.1.1.1", "v3.1.1", "3.1.1-", "3.1.1 kit", ""] {
        let err = text.parse::<ReleaseVersion>().unwrap_err();
        assert!(matches!(err, VersionError::InvalidFormat(ref s) if s == text));
    }
}

#[test]
fn test_version_error_message() {
    let err = "3.1".parse::<ReleaseVersion>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "string 3.1 does not match the version string pattern!\n\
         Valid examples:\n\t3.1.1\n\t3.1.1-kit\n\t3.1.1+kit"
    );
}

#[test]
fn test_bundle_code_pads_single_digit_minor() {
    assert_eq!(version("1.2.3").bundle_code(), "1203");
    assert_eq!(version("5.13.1").bundle_code(), "5131");
    assert_eq!(version("5.0.10").bundle_code(), "50010");
    assert_eq!(version("5.4.1-kit").bundle_code(), "5401");
}

#[test]
fn test_branch_and_tag_names() {
    let v = version("5.13.1");
    assert_eq!(v.branch_name(false), "release-5.13.1");
    assert_eq!(v.branch_name(true), "internal-release-5.13.1");
    assert_eq!(v.tag(), "v5.13.1");
    assert_eq!(v.to_string(), "5.13.1");
}

// --- rules ---

#[test]
fn test_sample_app_version_rules() {
    let rules = sample_app_version_rules(&version("5.13.1")).unwrap();
    let (output, matches) = patch(PROJECT_SETTINGS, rules);

    assert_eq!(matches, vec![1, 1, 1]);
    assert_eq!(
        output,
        PROJECT_SETTINGS
            .replace("bundleVersion: 5.0.0", "bundleVersion: 5.13.1")
            .replace("iOS: 50000", "iOS: 5131")
            .replace("AndroidBundleVersionCode: 50000", "AndroidBundleVersionCode: 5131")
    );
}

#[test]
fn test_defines_rule_strips_configured_symbols() {
    let stripped = Config::default().sanitize.stripped_defines;
    let (output, matches) = patch(PROJECT_SETTINGS, [defines_rule(&stripped).unwrap()]);

    assert_eq!(matches, vec![2]);
    assert!(output.contains("\n    1: UNITY_PURCHASING\n"));
    assert!(output.contains("\n    4: \n"));
    assert!(output.contains("  bundleVersion: 5.0.0\n"));
}

#[test]
fn test_defines_rule_keeps_unlisted_symbols() {
    let (output, _) = patch(
        "    7: A;mopub_developer;B;;C\n",
        [defines_rule(&["mopub_developer".to_string()]).unwrap()],
    );
    assert_eq!(output, "    7: A;B;;C\n");
}

#[test]
fn test_public_sdk_rule() {
    let script = "#!/bin/bash\n: \"${INTERNAL_SDK:=true}\"\nset -e\n";
    let (output, matches) = patch(script, [public_sdk_rule().unwrap()]);

    assert_eq!(matches, vec![1]);
    assert_eq!(
        output,
        "#!/bin/bash\n: \"${INTERNAL_SDK:=false}\"\nset -e\n"
    );
}

// --- flows ---

fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Private repository laid out like the SDK repo, with no submodules.
fn private_workspace(dry: bool) -> (TempDir, Config) {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let private = temp.path().join("private");
    let settings = private.join("unity-sample-app/ProjectSettings");
    let scripts = private.join("scripts");
    fs::create_dir_all(&settings).unwrap();
    fs::create_dir_all(&scripts).unwrap();

    fs::write(settings.join("ProjectSettings.asset"), PROJECT_SETTINGS).unwrap();
    for name in [
        "mopub-android-sdk-unity-build.sh",
        "mopub-ios-sdk-unity-build.sh",
    ] {
        let script = scripts.join(name);
        fs::write(&script, "#!/bin/bash\n: \"${INTERNAL_SDK:=true}\"\n").unwrap();
        make_executable(&script);
    }
    let build = scripts.join("build.sh");
    fs::write(&build, "#!/bin/sh\nexit 0\n").unwrap();
    make_executable(&build);
    fs::write(
        private.join("Banner.cs"),
        "class Banner {\n    // TODO: internal ticket\n    void Show() {}\n}\n",
    )
    .unwrap();

    git(&private, &["init", "--quiet", "--initial-branch=master"]);
    git(&private, &["config", "user.email", "test@example.com"]);
    git(&private, &["config", "user.name", "Test"]);
    git(&private, &["add", "-A", "."]);
    git(&private, &["commit", "--quiet", "-m", "Initial commit"]);

    let config = Config::parse(&format!(
        "[global]\n\
         dry = {dry}\n\
         [paths]\n\
         workspace = '{}'\n\
         private_repo = 'private'\n\
         public_repo = 'public'\n\
         [submodules]\n\
         external = []\n\
         internal = []\n",
        temp.path().display()
    ))
    .expect("valid config");
    (temp, config)
}

#[tokio::test]
async fn test_candidate_flow_in_test_mode() {
    let (temp, config) = private_workspace(false);
    let private = temp.path().join("private");
    let base = git(&private, &["rev-parse", "HEAD"]);

    let release = Release::new(&config, version("1.2.3")).unwrap();
    let branch = release.create_candidate(None, true).await.unwrap();

    assert_eq!(branch, "release-1.2.3");
    assert_eq!(git(&private, &["branch", "--show-current"]), "release-1.2.3");
    assert_eq!(git(&private, &["rev-parse", "master"]), base);

    let log = git(&private, &["log", "--format=%s", &format!("{base}..HEAD")]);
    insta::assert_snapshot!(log, @r"
    Release: version 1.2.3
    Make build scripts use public SDKs
    Update bundle version and codes to 1.2.3
    Update to latest Android and iOS SDKs
    ");
    assert_eq!(git(&private, &["tag", "--list"]), "v1.2.3");
    assert_eq!(git(&private, &["status", "--porcelain"]), "");

    let settings = fs::read_to_string(
        private.join("unity-sample-app/ProjectSettings/ProjectSettings.asset"),
    )
    .unwrap();
    assert!(settings.contains("  bundleVersion: 1.2.3\n"));
    assert!(settings.contains("    iOS: 1203\n"));
    assert!(settings.contains("  AndroidBundleVersionCode: 1203\n"));
    assert!(settings.contains("    1: UNITY_PURCHASING\n"));

    let script = private.join("scripts/mopub-ios-sdk-unity-build.sh");
    assert_eq!(
        fs::read_to_string(&script).unwrap(),
        "#!/bin/bash\n: \"${INTERNAL_SDK:=false}\"\n"
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        assert_eq!(fs::metadata(&script).unwrap().permissions().mode() & 0o111, 0o111);
    }

    assert_eq!(
        fs::read_to_string(private.join("Banner.cs")).unwrap(),
        "class Banner {\n    void Show() {}\n}\n"
    );
}

#[tokio::test]
async fn test_internal_candidate_keeps_internal_setup() {
    let (temp, config) = private_workspace(false);
    let private = temp.path().join("private");

    let release = Release::new(&config, version("1.2.3")).unwrap();
    let branch = release.create_internal_candidate(None, true).await.unwrap();

    assert_eq!(branch, "internal-release-1.2.3");
    assert_eq!(git(&private, &["tag", "--list"]), "");
    assert!(
        fs::read_to_string(private.join("scripts/mopub-android-sdk-unity-build.sh"))
            .unwrap()
            .contains("INTERNAL_SDK:=true")
    );
    assert!(
        fs::read_to_string(private.join("Banner.cs"))
            .unwrap()
            .contains("// TODO")
    );
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let (temp, config) = private_workspace(true);
    let private = temp.path().join("private");
    let base = git(&private, &["rev-parse", "HEAD"]);

    let release = Release::new(&config, version("1.2.3")).unwrap();
    release.create_candidate(None, true).await.unwrap();

    assert_eq!(git(&private, &["rev-parse", "HEAD"]), base);
    assert_eq!(git(&private, &["branch", "--show-current"]), "master");
    assert_eq!(git(&private, &["status", "--porcelain"]), "");
    assert_eq!(git(&private, &["tag", "--list"]), "");
}

#[test]
fn test_existing_remote_branch_is_rejected() {
    let (temp, config) = private_workspace(false);
    let private = temp.path().join("private");
    git(temp.path(), &["init", "--quiet", "--bare", "origin.git"]);
    let origin = temp.path().join("origin.git");
    git(&private, &["remote", "add", "origin", origin.to_str().unwrap()]);
    git(&private, &["push", "--quiet", "origin", "master", "master:release-1.2.3"]);

    let release = Release::new(&config, version("1.2.3")).unwrap();
    let err = release
        .create_release_branch(Some("HEAD"), false, false)
        .unwrap_err();
    assert!(
        format!("{err:#}").contains("release branch release-1.2.3 exists on the origin remote")
    );

    // test mode skips the remote check
    let branch = release
        .create_release_branch(Some("HEAD"), false, true)
        .unwrap();
    assert_eq!(branch, "release-1.2.3");
}

#[test]
fn test_missing_version_field_fails_step() {
    let (temp, config) = private_workspace(false);
    let settings = temp
        .path()
        .join("private/unity-sample-app/ProjectSettings/ProjectSettings.asset");
    fs::write(&settings, "PlayerSettings:\n  bundleVersion: 5.0.0\n").unwrap();

    let release = Release::new(&config, version("1.2.3")).unwrap();
    let err = release.update_sample_app_version("master").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("didn't find all provided patterns"));
    assert!(message.contains(r"pattern:     iOS: \d+ replacement:     iOS: 1203"));
}

#[test]
fn test_remove_unreleased_code() {
    let temp = tempfile::tempdir().unwrap();
    let public = temp.path().join("public");
    for path in [
        "scripts/private/release.py",
        "scripts/build.sh",
        "Assets/Plugins/Android/mopub-sdk.aar",
        "Assets/Plugins/Android/libs/unity-classes.jar",
        "Assets/Plugins/Android/libs/mopub-sdk-base.jar",
        "Assets/MoPub/Editor/vungle-ads.jar",
    ] {
        let file = public.join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, "").unwrap();
    }

    let config = Config::parse(&format!(
        "[paths]\nworkspace = '{}'\npublic_repo = 'public'\n",
        temp.path().display()
    ))
    .unwrap();
    let release = Release::new(&config, version("1.2.3")).unwrap();
    release.remove_unreleased_code().unwrap();

    assert!(!public.join("scripts/private").exists());
    assert!(public.join("scripts/build.sh").exists());
    assert!(!public.join("Assets/Plugins/Android/mopub-sdk.aar").exists());
    assert!(!public.join("Assets/Plugins/Android/libs/unity-classes.jar").exists());
    assert!(public.join("Assets/Plugins/Android/libs/mopub-sdk-base.jar").exists());
    assert!(!public.join("Assets/MoPub/Editor/vungle-ads.jar").exists());
}

#[test]
fn test_update_sdk_submodules_pulls_nested_checkouts() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    git(root, &["init", "--quiet", "--bare", "--initial-branch=master", "sdk.git"]);
    git(root, &["clone", "--quiet", "sdk.git", "upstream"]);
    let upstream = root.join("upstream");
    git(&upstream, &["config", "user.email", "test@example.com"]);
    git(&upstream, &["config", "user.name", "Test"]);
    git(&upstream, &["commit", "--quiet", "--allow-empty", "-m", "sdk 1"]);
    git(&upstream, &["push", "--quiet", "origin", "HEAD:master"]);

    let private = root.join("private");
    fs::create_dir_all(&private).unwrap();
    git(&private, &["init", "--quiet", "--initial-branch=master"]);
    let sdk = root.join("sdk.git");
    git(&private, &["clone", "--quiet", sdk.to_str().unwrap(), "mopub-android-sdk"]);

    git(&upstream, &["commit", "--quiet", "--allow-empty", "-m", "sdk 2"]);
    git(&upstream, &["push", "--quiet", "origin", "HEAD:master"]);
    let latest = git(&upstream, &["rev-parse", "HEAD"]);

    let config = Config::parse(&format!(
        "[paths]\nworkspace = '{}'\n[submodules]\nexternal = ['mopub-android-sdk']\ninternal = []\n",
        root.display()
    ))
    .unwrap();
    let release = Release::new(&config, version("1.2.3")).unwrap();
    release
        .update_sdk_submodules(release.private_repo(), false)
        .unwrap();

    assert_eq!(
        git(&private.join("mopub-android-sdk"), &["rev-parse", "HEAD"]),
        latest
    );
}
