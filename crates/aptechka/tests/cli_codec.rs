#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output, Stdio};

const MEDICINE_JSON: &str = r#"{"pharmacy_id":"p1","id":7,"name":"X","expiry_date":"2025-01-01","quantity":3,"unit":"таб.","min_threshold":null}"#;
const MEDICINE_FRAME: &str = r#"["p1",7,"X","20250101",3,0,null,null,null,null,null,null,null]"#;

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

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn encode_medicine_as_positional_frame() {
    let output = aptechka(&[
        "--format",
        "raw",
        "encode",
        "--kind",
        "positional",
        "--data",
        MEDICINE_JSON,
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), MEDICINE_FRAME);
}

#[test]
fn decode_positional_frame_back_to_json() {
    let output = aptechka(&[
        "--format",
        "json",
        "decode",
        "--content-type",
        "application/x-lwp-v1",
        "--data",
        MEDICINE_FRAME,
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let record: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(record["pharmacy_id"], "p1");
    assert_eq!(record["id"], 7);
    assert_eq!(record["expiry_date"], "2025-01-01");
    assert_eq!(record["unit"], "таб.");
    assert_eq!(record["min_threshold"], serde_json::Value::Null);
}

#[test]
fn decode_positional_list() {
    let list = format!("[{MEDICINE_FRAME},{MEDICINE_FRAME}]");
    let output = aptechka(&[
        "--format",
        "json",
        "decode",
        "-t",
        "application/lwp",
        "--data",
        &list,
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let records: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(records.as_array().map(Vec::len), Some(2));
}

#[test]
fn encode_without_pharmacy_id_fails_with_data_invalid() {
    let output = aptechka(&["encode", "--kind", "lwp", "--data", r#"{"id":7}"#]);

    assert_eq!(output.status.code(), Some(60));
    assert!(stderr(&output).contains("pharmacy_id is missing or blank"));
}

#[test]
fn wrong_frame_length_fails_with_data_invalid() {
    let output = aptechka(&["decode", "-t", "application/lwp", "--data", r#"["p1",1]"#]);

    assert_eq!(output.status.code(), Some(60));
    assert!(stderr(&output).contains("invalid LWP frame length 2"));
}

#[test]
fn encode_msgpack_prints_hex_in_json_output() {
    let output = aptechka(&[
        "--format",
        "json",
        "encode",
        "--kind",
        "msgpack",
        "--data",
        r#"{"a":1}"#,
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains(r#""content_type":"application/msgpack""#));
    assert!(out.contains(r#""payload":["81a16101"]"#));
}

#[test]
fn msgpack_trailing_bytes_are_ignored_by_default() {
    let output = aptechka(&[
        "--format",
        "json",
        "decode",
        "-t",
        "application/msgpack",
        "--hex",
        "81a161010000",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), r#"{"a":1}"#);
}

#[test]
fn msgpack_trailing_bytes_fail_with_no_recover() {
    let output = aptechka(&[
        "--no-recover",
        "decode",
        "-t",
        "application/msgpack",
        "--hex",
        "81a161010000",
    ]);

    assert_eq!(output.status.code(), Some(60));
    assert!(stderr(&output).contains("Extra 2 of 6 byte(s) found at buffer[4]"));
}

#[test]
fn msgpack_internal_corruption_fails() {
    let output = aptechka(&["decode", "-t", "application/msgpack", "--hex", "8fa16101"]);

    assert_eq!(output.status.code(), Some(60));
    assert!(stderr(&output).contains("malformed MessagePack"));
}

#[test]
fn unknown_content_type_has_own_exit_code() {
    let output = aptechka(&["decode", "-t", "text/xml", "--data", "<x/>"]);

    assert_eq!(output.status.code(), Some(61));
    assert!(stderr(&output).contains("unsupported content type: text/xml"));
}

#[test]
fn encode_reads_stdin_without_input_flag() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_aptechka"))
        .args(["--format", "raw", "encode", "--kind", "plain"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("aptechka should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(br#"{"pharmacy_id":"p1"}"#)
        .expect("stdin should accept input");

    let output = child.wait_with_output().expect("aptechka should finish");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), r#"{"pharmacy_id":"p1"}"#);
}
