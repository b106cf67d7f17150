//! Integration tests for top-level CLI behavior.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use chrono::Utc;
use serde_json::{json, Value};

use archlens::cassette::format::{Cassette, Interaction};

use common::{demo_entries, model_reply, stage1_body, stage2_body, write_zip};

fn run_archlens(upload_dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_archlens");
    Command::new(bin)
        .args(args)
        .env("ARCHLENS_UPLOAD_DIR", upload_dir)
        .env("ARCHLENS_STAGE_DELAY_SECS", "0")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run archlens binary")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be one JSON document")
}

fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
    let cassette = Cassette {
        name: "cli".into(),
        recorded_at: Utc::now(),
        model: "HCX-007".into(),
        interactions,
    };
    std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
}

fn gateway_reply(seq: u64, body: &Value) -> Interaction {
    Interaction {
        seq,
        port: "gateway".into(),
        method: "call".into(),
        input: json!(null),
        output: json!({"Ok": model_reply(body)}),
    }
}

#[test]
fn summarize_prints_parsed_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "demo.zip", &demo_entries());

    let output = run_archlens(dir.path(), &["summarize", archive.to_str().unwrap()]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["fileCount"], 3);
    assert_eq!(json["folderCount"], 2);
    assert!(json["contents"]["package.json"].is_string());
}

#[test]
fn summarize_prompt_prints_stage1_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "demo.zip", &demo_entries());

    let output = run_archlens(dir.path(), &["summarize", archive.to_str().unwrap(), "--prompt"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("STAGE 1:"));
    assert!(stdout.contains("# Project Structure"));
    assert!(stdout.contains("# Configuration Files Found"));
}

#[test]
fn replayed_analysis_prints_success_body() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "demo.zip", &demo_entries());
    let cassette = dir.path().join("demo.cassette.yaml");
    write_cassette(&cassette, vec![gateway_reply(0, &stage1_body()), gateway_reply(1, &stage2_body())]);

    let output = run_archlens(
        &dir.path().join("uploads"),
        &["analyze", archive.to_str().unwrap(), "--replay", cassette.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["projectInfo"]["name"], "demo");
    assert_eq!(json["data"]["boundaries"]["backend"]["layers"][0]["files"], json!(["src/index.js"]));
}

#[test]
fn corrupt_archive_prints_error_body_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("broken.zip");
    std::fs::write(&archive, "this is not a zip archive").unwrap();
    let cassette = dir.path().join("empty.cassette.yaml");
    write_cassette(&cassette, Vec::new());

    let output = run_archlens(
        &dir.path().join("uploads"),
        &["analyze", archive.to_str().unwrap(), "--replay", cassette.to_str().unwrap()],
    );
    assert!(!output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "INVALID_ZIP");
    assert!(String::from_utf8_lossy(&output.stderr).contains("status 400"));
}

#[test]
fn live_analysis_without_api_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "demo.zip", &demo_entries());

    let output = Command::new(env!("CARGO_BIN_EXE_archlens"))
        .args(["analyze", archive.to_str().unwrap()])
        .env_remove("ARCHLENS_API_KEY")
        .env("ARCHLENS_UPLOAD_DIR", dir.path().join("uploads"))
        .output()
        .expect("failed to run archlens binary");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ARCHLENS_API_KEY is not set"));
}

#[test]
fn missing_api_key_is_reported_before_the_upload_is_checked() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("broken.zip");
    std::fs::write(&archive, "this is not a zip archive").unwrap();
    let uploads = dir.path().join("uploads");

    let output = Command::new(env!("CARGO_BIN_EXE_archlens"))
        .args(["analyze", archive.to_str().unwrap()])
        .env_remove("ARCHLENS_API_KEY")
        .env("ARCHLENS_UPLOAD_DIR", &uploads)
        .output()
        .expect("failed to run archlens binary");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ARCHLENS_API_KEY is not set"));
    assert!(!stderr.contains("INVALID_ZIP"));
    assert!(!uploads.exists());
}

#[test]
fn unknown_subcommand_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_archlens(dir.path(), &["deploy"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unrecognized subcommand"));
}
