// SPDX-License-Identifier: Apache-2.0

use semlink_core::{
    load_toml_file, resolve_semlink_config_candidates, resolve_semlink_config_path,
    ConfigPathScope, Error,
};
use std::path::{Path, PathBuf};

#[derive(Debug, serde::Deserialize)]
struct Sample {
    name: String,
}

#[test]
fn workspace_scope_is_relative_and_stable() {
    assert_eq!(
        resolve_semlink_config_path(ConfigPathScope::Workspace),
        PathBuf::from(".semlink").join("config.toml")
    );
}

#[test]
fn explicit_path_is_first_candidate() {
    let explicit = Path::new("/tmp/explicit.toml");
    let candidates = resolve_semlink_config_candidates(Some(explicit));
    assert_eq!(candidates.first().map(PathBuf::as_path), Some(explicit));
    assert!(candidates.len() >= 3);
}

#[test]
fn toml_loader_reports_path_on_parse_failure() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let good = tmp.path().join("good.toml");
    std::fs::write(&good, "name = \"semlink\"\n").expect("write good");
    let sample: Sample = load_toml_file(&good).expect("load good");
    assert_eq!(sample.name, "semlink");

    let bad = tmp.path().join("bad.toml");
    std::fs::write(&bad, "name = \n").expect("write bad");
    let err = load_toml_file::<Sample>(&bad).expect_err("bad toml must fail");
    assert!(matches!(err, Error::Config { ref path, .. } if path == &bad));
}
