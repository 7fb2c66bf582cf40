//! Error handling integration tests for rawcp CLI.
//!
//! These tests verify failure categories and their exit statuses:
//! - Invalid input (usage, zero buffer, source == target) exits 1
//! - Copy-phase failures (open, existing target) exit 2

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_missing_arguments_is_usage_error() {
    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--source"));
}

#[test]
fn test_help_succeeds() {
    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--buffer-size"));
}

#[test]
fn test_source_equals_target() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("disk.img", 1024, 1);
    let before = fs::read(&src).unwrap();

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&src)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("must not be the same as target"));

    assert_eq!(fs::read(&src).unwrap(), before);
}

#[test]
fn test_zero_buffer_size() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("disk.img", 1024, 2);
    let dst = fixture.path("target.img");

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("-b")
        .arg("0")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid_input"));

    assert!(!dst.exists());
}

#[test]
fn test_missing_source() {
    let fixture = TestFixture::new();

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(fixture.path("nope.img"))
        .arg("-t")
        .arg(fixture.path("target.img"))
        .arg("-q")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[source_open]"));
}

#[test]
fn test_target_in_missing_directory() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("disk.img", 1024, 3);

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(fixture.path("no/such/dir/target.img"))
        .arg("-q")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[target_open]"));
}

#[test]
fn test_existing_target_with_error_strategy() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("disk.img", 1024, 4);
    let dst = fixture.path("target.img");
    fs::write(&dst, "precious").unwrap();

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("--on-existing")
        .arg("error")
        .arg("-q")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[target_exists]"));

    assert_eq!(fs::read_to_string(&dst).unwrap(), "precious");
}

#[test]
fn test_source_is_directory() {
    let fixture = TestFixture::new();
    let dir = fixture.path("a_directory");
    fs::create_dir(&dir).unwrap();

    // Opening a directory succeeds on Unix but reading it fails
    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&dir)
        .arg("-t")
        .arg(fixture.path("target.img"))
        .arg("-q")
        .assert()
        .failure()
        .code(2);
}
