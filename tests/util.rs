//! Shared test utilities for integration tests
//!
//! Every command runs against its own temporary state directory so the
//! user's real snapshot is never read or written.

#![allow(dead_code)]

use assert_cmd::Command;

/// Scratch workspace: the state dir for snapshots plus a cwd without
/// any wpblueprint config file in it.
pub fn workspace() -> assert_fs::TempDir
{
    assert_fs::TempDir::new().expect("tempdir")
}

/// `wpbp` bound to `tmp` as both working directory and state dir.
pub fn wpbp(tmp: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("wpbp").expect("bin");
    cmd.current_dir(tmp.path())
        .env_remove("WPBP_BASE_URL")
        .env_remove("WPBP_STATE_DIR")
        .env_remove("WPBP_STORAGE_KEY")
        .arg("--state-dir")
        .arg(tmp.path().join("state"));
    cmd
}

/// Run `wpbp` with `args` and return stdout, asserting success.
pub fn stdout_of(
    tmp: &assert_fs::TempDir,
    args: &[&str],
) -> String
{
    let assert = wpbp(tmp)
        .args(args)
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8")
}

/// Path of the snapshot file under the default storage key.
pub fn snapshot_path(tmp: &assert_fs::TempDir) -> std::path::PathBuf
{
    tmp.path()
        .join("state")
        .join("wp_playground_blueprint_v1.json")
}
