use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[simulation]
dt = 0.1
log_every = 5
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn run_json(args: &[&str]) -> Vec<serde_json::Value> {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("cruise").unwrap();
    cmd.arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg);
    for a in args {
        cmd.arg(a);
    }
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8_lossy(&out)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON line {l:?}: {e}")))
        .collect()
}

/// Validate the JSONL schema for a successful run.
#[rstest]
fn jsonl_summary_schema() {
    let lines = run_json(&["run", "--ticks", "150"]);
    let summary = lines
        .iter()
        .find(|v| v["kind"] == "summary")
        .expect("summary line");

    assert_eq!(summary["ticks"], 150);
    assert!(summary["final_speed"].as_f64().unwrap() > 78.0);
    assert_eq!(summary["target"], 80.0);
    assert_eq!(summary["band"], serde_json::json!([78.0, 81.0]));
    assert_eq!(summary["in_band"], true);
    assert!(summary["settled_at"].is_number());
    assert!(summary["max_abs_deviation"].is_number());
    assert!(summary["missed_deadlines"].is_u64());
    assert!(summary["max_latency_us"].is_u64());
}

#[rstest]
fn jsonl_sample_schema() {
    let lines = run_json(&["run", "--ticks", "10", "--print-every", "1"]);
    let samples: Vec<_> = lines.iter().filter(|v| v["kind"] == "sample").collect();
    assert_eq!(samples.len(), 10);
    for key in [
        "tick",
        "time",
        "target",
        "speed",
        "error_volts",
        "command",
        "command_volts",
        "p",
        "i",
        "d",
        "correction",
        "disturbance",
        "actuator_real",
        "in_band",
    ] {
        assert!(samples[0].get(key).is_some(), "missing key {key}");
    }
    assert_eq!(samples[0]["tick"], 1);
    assert_eq!(samples[9]["tick"], 10);
}

#[rstest]
fn jsonl_history_is_bounded() {
    let lines = run_json(&["run", "--ticks", "200", "--history"]);
    let history: Vec<_> = lines.iter().filter(|v| v["kind"] == "history").collect();
    assert_eq!(history.len(), 150);
    assert_eq!(history[0]["tick"], 51);
    assert_eq!(history[149]["tick"], 200);
}

#[rstest]
fn jsonl_error_object_on_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[simulation]\nhistory_capacity = 0\n").unwrap();

    let out = Command::cargo_bin("cruise")
        .unwrap()
        .arg("--json")
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    let line = stderr
        .lines()
        .find(|l| l.contains("\"reason\""))
        .unwrap_or_else(|| panic!("no JSON error line; stderr was: {stderr}"));
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Error");
    assert!(v["message"].as_str().unwrap().contains("history_capacity"));
}
