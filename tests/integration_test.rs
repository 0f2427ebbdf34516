//! Integration tests for the debtradar CLI
//!
//! Each test copies the `shop` fixture project into its own temp directory
//! and runs the built binary against it.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const MONEY: &str = "src/main/java/shop/Money.java";
const ORDER: &str = "src/main/java/shop/Order.java";
const DISCOUNT: &str = "src/main/java/shop/Discount.java";
const INVOICE: &str = "src/main/java/shop/billing/Invoice.java";
const ORDER_TEST: &str = "src/test/java/shop/OrderTest.java";

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop")
}

fn copy_dir(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).expect("create dir");
    for entry in std::fs::read_dir(from).expect("read fixtures") {
        let entry = entry.expect("entry");
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), &target).expect("copy fixture");
        }
    }
}

fn create_test_workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    copy_dir(&fixtures_path(), dir.path());
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_debtradar"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to run debtradar")
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let mut all = args.to_vec();
    all.extend(["--format", "json"]);
    let output = run(dir, &all);
    assert!(
        output.status.success(),
        "debtradar {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}

#[test]
fn test_analyze_reports_production_files_only() {
    let dir = create_test_workspace();
    let result = run_json(dir.path(), &["analyze"]);

    assert_eq!(result["analyzed_file_count"], 4);
    assert_eq!(result["errored_file_count"], 0);
    assert_eq!(result["cancelled"], false);

    let paths: Vec<&str> = result["files"]
        .as_array()
        .expect("files")
        .iter()
        .filter_map(|f| f["file_path"].as_str())
        .collect();
    assert_eq!(paths, vec![DISCOUNT, MONEY, ORDER, INVOICE]);
    assert!(!paths.contains(&ORDER_TEST));

    assert_eq!(result["smell_counts"]["Long Method"], 1);
    let total = result["total_smells"].as_u64().expect("total");
    let by_severity: u64 = result["severity_counts"]
        .as_object()
        .expect("severity counts")
        .values()
        .filter_map(|v| v.as_u64())
        .sum();
    assert_eq!(total, by_severity);
}

#[test]
fn test_analyze_is_the_default_command() {
    let dir = create_test_workspace();
    let output = run(dir.path(), &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("debtradar analysis"));
    assert!(stdout.contains("Long Method"));
}

#[test]
fn test_config_disables_detector() {
    let dir = create_test_workspace();
    std::fs::write(
        dir.path().join("debtradar.toml"),
        "[detectors.long-method]\nenabled = false\n",
    )
    .expect("write config");

    let result = run_json(dir.path(), &["analyze"]);
    assert!(result["smell_counts"].get("Long Method").is_none());
}

#[test]
fn test_skip_detector_flag() {
    let dir = create_test_workspace();
    let result = run_json(dir.path(), &["analyze", "--skip-detector", "long-method"]);
    assert!(result["smell_counts"].get("Long Method").is_none());
}

#[test]
fn test_file_command_scores_one_file() {
    let dir = create_test_workspace();
    let analysis = run_json(dir.path(), &["file", ORDER]);

    assert_eq!(analysis["file_path"], ORDER);
    let smell = analysis["smells"]
        .as_array()
        .expect("smells")
        .iter()
        .find(|s| s["detector_id"] == "design.long-method")
        .expect("long method smell");
    assert_eq!(smell["pointer"]["enclosing_member"], "describe");
    let score = analysis["technical_debt_score"].as_f64().expect("score");
    assert!(score > 0.0 && score <= 100.0);
    assert!(analysis["refactoring_plan"].as_object().is_some_and(|p| !p.is_empty()));
}

#[test]
fn test_file_command_rejects_missing_file() {
    let dir = create_test_workspace();
    let output = run(dir.path(), &["file", "src/main/java/shop/Nope.java"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_graph_links_imports_inheritance_and_tests() {
    let dir = create_test_workspace();
    let graph = run_json(dir.path(), &["graph"]);

    assert_eq!(graph["metrics"]["total_files"], 5);
    assert!(strings(&graph["forward"][INVOICE]).contains(&ORDER.to_string()));
    assert!(strings(&graph["forward"][DISCOUNT]).contains(&MONEY.to_string()));
    assert!(strings(&graph["reverse"][ORDER]).contains(&INVOICE.to_string()));
    assert_eq!(graph["metrics"]["most_depended_on_file"], MONEY);
    assert!(graph["metrics"]["cycles"].as_array().is_some_and(|c| c.is_empty()));

    let extends = graph["edges"]
        .as_array()
        .expect("edges")
        .iter()
        .any(|e| e["source"] == DISCOUNT && e["target"] == MONEY && e["kind"] == "EXTENDS");
    assert!(extends);
}

#[test]
fn test_ripple_follows_transitive_dependents() {
    let dir = create_test_workspace();
    let report = run_json(dir.path(), &["ripple", ORDER]);
    let files = strings(&report["ripple_files"]);
    assert_eq!(files, vec![ORDER, INVOICE, ORDER_TEST]);

    let report = run_json(dir.path(), &["ripple", MONEY]);
    let files = strings(&report["ripple_files"]);
    for expected in [MONEY, ORDER, DISCOUNT, INVOICE, ORDER_TEST] {
        assert!(files.contains(&expected.to_string()), "missing {}", expected);
    }
}

#[test]
fn test_ripple_text_output() {
    let dir = create_test_workspace();
    let output = run(dir.path(), &["ripple", ORDER]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 files affected"));
    assert!(stdout.contains(INVOICE));
}

#[test]
fn test_impact_rename_class_with_subclass_is_high_risk() {
    let dir = create_test_workspace();
    let analysis = run_json(
        dir.path(),
        &["impact", "rename-class", "--target-class", "Money", "--new-name", "Amount"],
    );

    assert_eq!(analysis["risk_level"], "HIGH");
    assert_eq!(analysis["operation"]["type"], "RENAME_CLASS");
    let impacts = analysis["impacted_files"].as_array().expect("impacts");
    assert!(impacts
        .iter()
        .any(|i| i["file"] == DISCOUNT && i["impact_type"] == "INHERITANCE"));
    assert!(impacts.iter().any(|i| i["file"] == ORDER));
    assert!(strings(&analysis["ripple_files"]).contains(&INVOICE.to_string()));
}

#[test]
fn test_impact_request_file() {
    let dir = create_test_workspace();
    std::fs::write(
        dir.path().join("op.json"),
        r#"{"type": "RENAME_METHOD", "targetClass": "Order", "oldName": "total", "newName": "sum"}"#,
    )
    .expect("write request");

    let analysis = run_json(dir.path(), &["impact", "--request", "op.json"]);
    let impacts = analysis["impacted_files"].as_array().expect("impacts");
    assert!(impacts
        .iter()
        .any(|i| i["file"] == INVOICE && i["impact_type"] == "METHOD_CALL"));
}

#[test]
fn test_impact_rejects_invalid_requests() {
    let dir = create_test_workspace();

    let output = run(dir.path(), &["impact", "inline-everything", "--target-class", "Money"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown refactoring operation"));

    let output = run(dir.path(), &["impact", "rename-class", "--target-class", "Money"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("new_name"));
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = run(dir.path(), &["init"]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.path().join("debtradar.toml")).expect("config");
    assert!(written.contains("[scoring.weights]"));

    let again = run(dir.path(), &["init"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    assert!(run(dir.path(), &["init", "--force"]).status.success());
}

#[test]
fn test_empty_project() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = run_json(dir.path(), &["analyze"]);
    assert_eq!(result["analyzed_file_count"], 0);
    assert_eq!(result["total_smells"], 0);
    assert!(result["files"].as_array().is_some_and(|f| f.is_empty()));
}
