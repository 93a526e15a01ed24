// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::{ConfigError, GitError, ReleaseError, ReleaseResult, SanitizeError, VersionError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "paths".to_string(),
        key: "workspace".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'workspace' in section '[paths]'"
    );
}

#[test]
fn test_patch_validation_lists_every_unmatched_rule() {
    let err = SanitizeError::PatchValidation {
        path: PathBuf::from("ProjectSettings.asset"),
        unmatched: vec![
            "pattern:     iOS: \\d+ replacement:     iOS: 510".to_string(),
            "pattern: x replacement: y".to_string(),
        ],
    };
    let text = err.to_string();
    assert!(text.starts_with("didn't find all provided patterns in ProjectSettings.asset"));
    assert!(text.contains("\n\tpattern:     iOS: \\d+ replacement:     iOS: 510"));
    assert!(text.ends_with("\n\tpattern: x replacement: y"));
}

#[test]
fn test_git_error_wraps_into_release_error() {
    let err: ReleaseError = GitError::BranchExists {
        branch: "release-5.1.0".to_string(),
        remote: "origin".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"git error: release branch release-5.1.0 exists on the origin remote"
    );
}

#[test]
fn test_version_error_shows_examples() {
    let err = VersionError::InvalidFormat("5.1".to_string());
    assert!(err.to_string().contains("3.1.1+kit"));
}

#[test]
fn test_release_error_size() {
    // every variant is a single Box
    let size = std::mem::size_of::<ReleaseError>();
    assert!(size <= 24, "ReleaseError is {size} bytes, expected <= 24");
}

#[test]
fn test_release_result_size() {
    let size = std::mem::size_of::<ReleaseResult<()>>();
    assert!(size <= 24, "ReleaseResult<()> is {size} bytes, expected <= 24");
}
