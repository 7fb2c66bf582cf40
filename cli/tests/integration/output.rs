//! JSON output integration tests for rawcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, pseudo_random};
use rawcopy::Digest;
use serde_json::Value;
use std::fs;

fn run_json(args: &[&std::ffi::OsStr]) -> (i32, Value) {
    let output = cargo_bin_cmd!("rawcp")
        .args(args)
        .arg("--output")
        .arg("json")
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    (output.status.code().unwrap(), value)
}

#[test]
fn test_json_success_report() {
    let fixture = TestFixture::new();
    let data = pseudo_random(12_345, 1);
    let src = fixture.path("image.img");
    fs::write(&src, &data).unwrap();
    let dst = fixture.path("target.img");

    let (code, value) = run_json(&[
        "-s".as_ref(),
        src.as_os_str(),
        "-t".as_ref(),
        dst.as_os_str(),
    ]);

    assert_eq!(code, 0);
    assert_eq!(value["schema_version"], "1.0");
    assert_eq!(value["outcome"], "verified");
    assert_eq!(value["bytes_read"], 12_345);
    assert_eq!(value["bytes_written"], 12_345);

    let digest = Digest::of(&data).to_hex();
    assert_eq!(value["verification"]["matches"], true);
    assert_eq!(value["verification"]["source_digest"], digest.as_str());
    assert_eq!(value["verification"]["target_digest"], digest.as_str());
}

#[test]
fn test_json_without_verification() {
    let fixture = TestFixture::new();
    let src = fixture.create_image("image.img", 100, 2);
    let dst = fixture.path("target.img");

    let (code, value) = run_json(&[
        "-s".as_ref(),
        src.as_os_str(),
        "-t".as_ref(),
        dst.as_os_str(),
        "--no-verify".as_ref(),
    ]);

    assert_eq!(code, 0);
    assert_eq!(value["outcome"], "copied");
    assert!(value["verification"].is_null());
}

#[test]
fn test_json_failure_report() {
    let fixture = TestFixture::new();
    let src = fixture.path("missing.img");
    let dst = fixture.path("target.img");

    let (code, value) = run_json(&[
        "-s".as_ref(),
        src.as_os_str(),
        "-t".as_ref(),
        dst.as_os_str(),
    ]);

    assert_eq!(code, 2);
    assert_eq!(value["outcome"], "failed");
    assert_eq!(value["error_code"], "source_open");
    assert!(
        value["error_message"]
            .as_str()
            .unwrap()
            .contains("missing.img")
    );
}
