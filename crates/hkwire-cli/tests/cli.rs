use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hkwire"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn sample_export() -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join("tape_session")
        .join("input.csv")
}

fn sample_frames() -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join("jsonl_frames")
        .join("input.jsonl")
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("decode").and(contains("stats")));
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.csv");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.pcap");
    fs::write(&input, b"").expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(
            contains("unsupported input format")
                .and(contains("hint: expected a .csv or .jsonl or .ndjson file")),
        );
}

#[test]
fn stdout_outputs_json_report() {
    let assert = cmd()
        .arg("decode")
        .arg(sample_export())
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["summary"]["frames_total"], 10);
    assert_eq!(value["frames"][1]["command_label"], "Play");
}

#[test]
fn report_is_written_to_file() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("decode")
        .arg(sample_frames())
        .arg("-o")
        .arg(&report)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let json = fs::read_to_string(&report).expect("report written");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["frames"][1]["data_label"], "3 times backward");
}

#[test]
fn text_renders_templates() {
    cmd()
        .arg("decode")
        .arg(sample_export())
        .arg("--text")
        .assert()
        .success()
        .stdout(
            contains("Tuner -> Tape: Play")
                .and(contains("Tape -> Tuner: Set time to display  00:12"))
                .and(contains("Tape -> Tuner: Current FF/FR speed 2 times forward")),
        );
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(sample_export())
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(sample_export())
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn strict_fails_on_invalid_payloads() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(sample_export())
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("undecodable payloads"));
}

#[test]
fn stats_lists_unique_values() {
    cmd()
        .arg("stats")
        .arg(sample_export())
        .assert()
        .success()
        .stdout(
            contains("Unique sources:\n\t0x0\n\t0x3\n\t0x9\n")
                .and(contains("Unique destinations:\n\t0x0\n\t0x3\n\t0x4\n"))
                .and(contains("Unique commands:")),
        )
        .stderr(contains("warning:").not());
}

#[test]
fn stats_warns_on_unexpected_header() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("export.csv");
    fs::write(&input, "Time,Type,Src,Dst,Cmd\n0.1,command,0x3,0x0,0x11\n").expect("write");

    cmd()
        .arg("stats")
        .arg(input)
        .assert()
        .success()
        .stdout(contains("\t0x11"))
        .stderr(
            contains("warning: unexpected export header")
                .and(contains("expected: Time [s],Type,Src,Dst,Cmd,Dat"))
                .and(contains("actual  : Time,Type,Src,Dst,Cmd")),
        );
}

#[test]
fn stats_fails_on_malformed_number() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("export.csv");
    fs::write(
        &input,
        "Time [s],Type,Src,Dst,Cmd,Dat\n0.1,command,0xZZ,0x0,0x11\n",
    )
    .expect("write");

    cmd()
        .arg("stats")
        .arg(input)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("invalid number in Src")));
}

#[test]
fn analyse_alias_runs_decode() {
    cmd()
        .arg("analyse")
        .arg(sample_frames())
        .arg("--text")
        .assert()
        .success()
        .stdout(contains("Tuner -> Tape: Play"));
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("decode")
        .arg(sample_export())
        .arg("--stdout")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}
