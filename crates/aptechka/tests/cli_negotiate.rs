#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn aptechka(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aptechka"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("aptechka should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn negotiate_picks_first_available() {
    let output = aptechka(&[
        "--format",
        "raw",
        "negotiate",
        "--accept",
        "application/msgpack;q=0.5, application/lwp, application/json;q=0.1",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "application/lwp");
}

#[test]
fn negotiate_skips_positional_for_reminders() {
    let output = aptechka(&[
        "--format",
        "json",
        "negotiate",
        "--entity",
        "reminder",
        "--accept",
        "application/lwp, application/msgpack",
    ]);

    assert!(output.status.success());
    let out: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(out["chosen"], "application/msgpack");
    assert_eq!(
        out["available"],
        serde_json::json!(["application/json", "application/msgpack"])
    );
}

#[test]
fn negotiate_falls_back_to_plain() {
    let output = aptechka(&["--format", "raw", "negotiate", "--accept", "text/html"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "application/json");
}

#[test]
fn encode_with_accept_header_negotiates() {
    let output = aptechka(&[
        "--format",
        "json",
        "encode",
        "--accept",
        "application/x-lwp-v1",
        "--data",
        r#"{"pharmacy_id":"p9"}"#,
    ]);

    assert!(output.status.success());
    let out: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(out["content_type"], "application/x-lwp-v1");
    assert_eq!(out["kind"], "positional");
}

#[test]
fn encode_with_wildcard_accept_uses_canonical_label() {
    let output = aptechka(&[
        "--format",
        "json",
        "encode",
        "--accept",
        "application/lwp, */*;q=0.1",
        "--data",
        r#"{"pharmacy_id":"p9"}"#,
    ]);

    assert!(output.status.success());
    let out: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(out["content_type"], "application/lwp");
}

#[test]
fn units_lists_code_table() {
    let output = aptechka(&["--format", "json", "units"]);

    assert!(output.status.success());
    let units: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(units[0], serde_json::json!({"code": 0, "unit": "таб."}));
    assert_eq!(units.as_array().map(Vec::len), Some(8));
}

#[test]
fn version_prints_package_version() {
    let output = aptechka(&["version"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("aptechka {}", env!("CARGO_PKG_VERSION"))
    );
}
