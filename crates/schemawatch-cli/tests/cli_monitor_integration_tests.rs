//! CLI integration tests
//!
//! Run the built binary against an offline catalog directory and check exit
//! codes, files written and rendered output.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("catalog")).unwrap();
        let ws = Self { temp };
        ws.write_entity(
            "s3",
            json!({
                "Name": "s3",
                "Actions": [{"Name": "GetObject", "Resources": [{"Name": "object"}], "ActionConditionKeys": ["s3:prefix"]}],
                "Resources": [{"Name": "object", "ARNFormats": ["arn:aws:s3:::${Bucket}/${Key}"], "ConditionKeys": ["aws:ResourceTag/${TagKey}"]}],
                "ConditionKeys": [{"Name": "s3:prefix", "Types": ["String"]}]
            }),
        );
        ws.write_entity(
            "iam",
            json!({
                "Name": "iam",
                "Actions": [{"Name": "PassRole"}],
                "ConditionKeys": [{"Name": "aws:SourceIp", "Types": ["IPAddress"]}]
            }),
        );
        ws
    }

    fn catalog_dir(&self) -> PathBuf {
        self.temp.path().join("catalog")
    }

    fn baseline(&self) -> PathBuf {
        self.temp.path().join("baseline.json")
    }

    fn write_entity(&self, name: &str, document: Value) {
        fs::write(
            self.catalog_dir().join(format!("{}.json", name)),
            serde_json::to_vec_pretty(&document).unwrap(),
        )
        .unwrap();
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_schemawatch"))
            .current_dir(self.temp.path())
            .env_remove("SCHEMAWATCH_SOURCE_URL")
            .env_remove("SCHEMAWATCH_BASELINE")
            .env_remove("SCHEMAWATCH_HISTORY_DIR")
            .env("SCHEMAWATCH_CATALOG_DIR", self.catalog_dir())
            .env("SCHEMAWATCH_LOG", "warn")
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    fn monitor(&self, extra: &[&str]) -> Output {
        let baseline = self.baseline();
        let mut args = vec!["monitor", "--all", "--baseline", baseline.to_str().unwrap()];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    fn history_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|n| n.starts_with("schema_") && n.ends_with(".json"))
            .collect();
        names.sort();
        names
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout: {}\nstderr: {}",
        stdout(output),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn test_first_run_creates_baseline() {
    let ws = Workspace::new();

    let output = ws.monitor(&[]);

    assert_exit(&output, 0);
    assert!(stdout(&output).contains("Baseline created"));
    let baseline = read_json(&ws.baseline());
    assert_eq!(baseline["schema_hash"].as_str().unwrap().len(), 64);
    assert_eq!(baseline["analyzed_entities"], json!(["iam", "s3"]));
}

#[test]
fn test_unchanged_catalog_exits_zero() {
    let ws = Workspace::new();
    assert_exit(&ws.monitor(&[]), 0);

    let output = ws.monitor(&[]);

    assert_exit(&output, 0);
    assert!(stdout(&output).contains("No schema changes detected."));
    assert!(ws.history_files().is_empty());
}

#[test]
fn test_new_field_exits_one_and_commits() {
    let ws = Workspace::new();
    assert_exit(&ws.monitor(&[]), 0);
    ws.write_entity("sqs", json!({"Name": "sqs", "Version": "v1"}));

    let output = ws.monitor(&[]);

    assert_exit(&output, 1);
    let text = stdout(&output);
    assert!(text.contains("New fields"));
    assert!(text.contains("Version"));
    assert_eq!(ws.history_files().len(), 1);
    let baseline = read_json(&ws.baseline());
    assert!(baseline["top_level_fields"]
        .as_array()
        .unwrap()
        .contains(&json!("Version")));

    // second run sees the committed baseline
    assert_exit(&ws.monitor(&[]), 0);
}

#[test]
fn test_no_commit_keeps_reporting() {
    let ws = Workspace::new();
    assert_exit(&ws.monitor(&[]), 0);
    ws.write_entity("sqs", json!({"Name": "sqs", "Version": "v1"}));

    assert_exit(&ws.monitor(&["--no-commit"]), 1);
    assert_exit(&ws.monitor(&["--no-commit"]), 1);
    assert!(ws.history_files().is_empty());
}

#[test]
fn test_corrupt_baseline_exits_two() {
    let ws = Workspace::new();
    fs::write(ws.baseline(), b"{ this is not json").unwrap();

    let output = ws.monitor(&[]);

    assert_exit(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_BASELINE_CORRUPT"));
    assert_eq!(fs::read(ws.baseline()).unwrap(), b"{ this is not json");
}

#[test]
fn test_missing_catalog_dir_exits_two() {
    let ws = Workspace::new();
    let missing = ws.temp.path().join("no-catalog");
    let baseline = ws.baseline();

    let output = ws.run(&[
        "--catalog-dir",
        missing.to_str().unwrap(),
        "monitor",
        "--baseline",
        baseline.to_str().unwrap(),
    ]);

    assert_exit(&output, 2);
    assert!(!baseline.exists());
}

#[test]
fn test_malformed_entity_is_skipped() {
    let ws = Workspace::new();
    fs::write(ws.catalog_dir().join("broken.json"), b"[1, 2, 3]").unwrap();

    let output = ws.monitor(&["--output-format", "json"]);

    assert_exit(&output, 0);
    let result: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["status"], "baseline_created");
    assert_eq!(result["current_schema"]["analyzed_entities"], json!(["iam", "s3"]));
    assert_eq!(result["skipped"][0]["name"], "broken");
    assert_eq!(result["skipped"][0]["code"], "ERR_MALFORMED_DOCUMENT");
}

#[test]
fn test_json_output_feeds_summarize() {
    let ws = Workspace::new();
    assert_exit(&ws.monitor(&[]), 0);
    ws.write_entity(
        "kms",
        json!({"Name": "kms", "ConditionKeys": [{"Name": "kms:KeySpec", "Types": ["ArrayOfString"]}]}),
    );

    let output = ws.monitor(&["--output-format", "json"]);
    assert_exit(&output, 1);
    let result: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["status"], "analysis_complete");
    assert_eq!(result["changes"]["has_changes"], true);
    assert!(result["changes"]["new_data_types"]
        .as_array()
        .unwrap()
        .contains(&json!("ArrayOfString")));

    let results_path = ws.temp.path().join("results.json");
    fs::write(&results_path, stdout(&output)).unwrap();
    let summary = ws.run(&["summarize", results_path.to_str().unwrap()]);

    assert_exit(&summary, 0);
    let markdown = stdout(&summary);
    assert!(markdown.starts_with("## Service Reference Schema Changes Detected"));
    assert!(markdown.contains("ArrayOfString"));
}

#[test]
fn test_seeded_sample_is_reproducible() {
    let ws = Workspace::new();
    for i in 0..8 {
        ws.write_entity(&format!("svc{}", i), json!({"Name": format!("svc{}", i)}));
    }

    let pick = |dir: &str| {
        let baseline = ws.temp.path().join(dir).join("baseline.json");
        let output = ws.run(&[
            "monitor",
            "--sample-size",
            "3",
            "--seed",
            "7",
            "--output-format",
            "json",
            "--baseline",
            baseline.to_str().unwrap(),
        ]);
        assert_exit(&output, 0);
        let result: Value = serde_json::from_str(&stdout(&output)).unwrap();
        result["current_schema"]["analyzed_entities"].clone()
    };

    let first = pick("a");
    assert_eq!(first.as_array().unwrap().len(), 3);
    assert_eq!(first, pick("b"));
}

#[test]
fn test_keep_history_prunes_older_copies() {
    let ws = Workspace::new();
    assert_exit(&ws.monitor(&[]), 0);
    ws.write_entity("sqs", json!({"Name": "sqs", "Version": "v1"}));
    assert_exit(&ws.monitor(&[]), 1);
    assert_eq!(ws.history_files().len(), 1);

    ws.write_entity(
        "kms",
        json!({"Name": "kms", "ConditionKeys": [{"Name": "kms:KeySpec", "Types": ["ArrayOfString"]}]}),
    );
    let output = ws.monitor(&["--keep-history", "1", "--output-format", "json"]);

    assert_exit(&output, 1);
    let result: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let newest = PathBuf::from(result["history_path"].as_str().unwrap());
    let newest_name = newest.file_name().unwrap().to_str().unwrap().to_string();
    assert_eq!(ws.history_files(), vec![newest_name]);
    assert!(read_json(&newest)["data_types"]
        .as_array()
        .unwrap()
        .contains(&json!("ArrayOfString")));
}

#[test]
fn test_zero_sample_size_writes_empty_baseline() {
    let ws = Workspace::new();
    let baseline = ws.baseline();

    let output = ws.run(&[
        "monitor",
        "--create-baseline",
        "--sample-size",
        "0",
        "--baseline",
        baseline.to_str().unwrap(),
    ]);

    assert_exit(&output, 0);
    let stored = read_json(&baseline);
    assert_eq!(stored["analyzed_entities"], json!([]));
    assert_eq!(stored["top_level_fields"], json!([]));

    let diff = ws.run(&[
        "monitor",
        "--sample-size",
        "0",
        "--baseline",
        baseline.to_str().unwrap(),
    ]);
    assert_exit(&diff, 2);
    assert!(String::from_utf8_lossy(&diff.stderr).contains("ERR_INVALID_INPUT"));
}
