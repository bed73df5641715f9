use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn satchel_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("satchel"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("SATCHEL_URL")
        .env_remove("SATCHEL_TOKEN")
        .env("SATCHEL_USER", "ada");
    cmd
}

fn write_config(home: &Path, yaml: &str) {
    let dir = home.join(".satchel");
    fs::create_dir_all(&dir).expect("config dir");
    fs::write(dir.join("config.yaml"), yaml).expect("config file");
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().expect("home");
    satchel_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("list"))
        .stdout(contains("fetch"))
        .stdout(contains("submit"))
        .stdout(contains("collect"));
}

#[test]
fn missing_remote_url_is_a_clear_error() {
    let home = TempDir::new().expect("home");
    write_config(home.path(), "username: ada\n");
    satchel_cmd(home.path())
        .args(["list", "--course", "math101"])
        .assert()
        .failure()
        .stderr(contains("remote"));
}

#[test]
fn missing_course_id_is_a_clear_error() {
    let home = TempDir::new().expect("home");
    write_config(
        home.path(),
        "username: ada\nremote_url: http://localhost:1\n",
    );
    satchel_cmd(home.path())
        .args(["fetch", "ps1"])
        .assert()
        .failure()
        .stderr(contains("course"));
}

#[test]
fn conflicting_list_modes_are_rejected() {
    let home = TempDir::new().expect("home");
    satchel_cmd(home.path())
        .args(["list", "--inbound", "--cached"])
        .assert()
        .failure();
}

#[test]
fn unreachable_remote_fails_without_touching_disk() {
    let home = TempDir::new().expect("home");
    write_config(
        home.path(),
        "username: ada\nremote_url: http://127.0.0.1:1\nassignment_dir: work\n",
    );
    satchel_cmd(home.path())
        .args(["fetch", "ps1", "--course", "math101"])
        .assert()
        .failure();
    assert!(!home.path().join("work").join("ps1").exists());
}
