//! Basic functionality integration tests for rawcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, pseudo_random};
use predicates::prelude::*;
use rstest::rstest;
use std::fs;

#[test]
fn test_basic_image_copy() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 300_000, 1);
    let dst = fixture.path("target.img");

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("--source")
        .arg(&src)
        .arg("--target")
        .arg(&dst)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("300000 bytes read, 300000 bytes written"))
        .stdout(predicate::str::contains("checksums match"));

    fixture.assert_same_content(&src, &dst);
}

#[rstest]
#[case::one_kib(1)]
#[case::odd_size(3)]
#[case::default(1024)]
#[case::larger_than_source(4096)]
fn test_copy_with_buffer_sizes(#[case] kib: usize) {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 1_000_003, kib as u64);
    let dst = fixture.path("target.img");

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("-b")
        .arg(kib.to_string())
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("checksums match"));

    fixture.assert_same_content(&src, &dst);
}

#[test]
fn test_empty_source() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("empty.img", 0, 0);
    let dst = fixture.path("target.img");

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 bytes read, 0 bytes written"))
        .stdout(predicate::str::contains(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ))
        .stdout(predicate::str::contains("checksums match"));

    assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
}

#[test]
fn test_nocheck_skips_verification() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 4096, 2);
    let dst = fixture.path("target.img");

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("--nocheck")
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification skipped"))
        .stdout(predicate::str::contains("checksums").not());

    fixture.assert_same_content(&src, &dst);
}

#[test]
fn test_overwrite_keeps_device_tail() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 1000, 3);
    let dst = fixture.path("device.img");
    let device = pseudo_random(5000, 4);
    fs::write(&dst, &device).unwrap();

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("checksums match"));

    let written = fs::read(&dst).unwrap();
    assert_eq!(written.len(), 5000);
    assert_eq!(&written[..1000], fs::read(&src).unwrap().as_slice());
    assert_eq!(&written[1000..], &device[1000..]);
}

#[test]
fn test_truncate_existing_target() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 1000, 5);
    let dst = fixture.create_image("old.img", 8000, 6);

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("--on-existing")
        .arg("truncate")
        .arg("-q")
        .assert()
        .success();

    fixture.assert_same_content(&src, &dst);
}

#[test]
fn test_verbose_reports_timing() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 2048, 7);
    let dst = fixture.path("target.img");

    let mut cmd = cargo_bin_cmd!("rawcp");
    cmd.arg("-s")
        .arg(&src)
        .arg("-t")
        .arg(&dst)
        .arg("-q")
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed in"));
}
