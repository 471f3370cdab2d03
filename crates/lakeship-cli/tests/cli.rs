//! End-to-end runs of the lakeship binary

use std::process::{Command, Output};

fn lakeship(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lakeship"))
        .args(args)
        .env_remove("LAKESHIP_REPORT_FORMAT")
        .env_remove("LAKESHIP_CONFIG")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_rules_filtered_by_kind() {
    let output = lakeship(&["rules", "--kind", "window", "--format", "json"]);
    assert!(output.status.success());

    let rules: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rules = rules.as_array().unwrap();
    assert!(!rules.is_empty());
    assert!(rules.iter().all(|rule| rule["kind"] == "window"));
}

#[test]
fn test_check_call_site_file() {
    let call = r#"{
        "name": "to_char",
        "kind": "scalar",
        "args": [
            {"type": "Column", "column": "created_at", "ty": "timestamp"},
            {"type": "Const", "ty": "text", "value": "YYYY-MM-DD"}
        ],
        "return_type": "text"
    }"#;
    let path = std::env::temp_dir().join("lakeship_cli_check.json");
    std::fs::write(&path, call).unwrap();

    let output = lakeship(&["check", path.to_str().unwrap(), "--format", "json"]);
    std::fs::remove_file(&path).ok();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["shippable"], true);
    assert_eq!(report["verdict"], "shippable");
    assert_eq!(report["rule"], "to_char(timestamp, text) [scalar]");
}

#[test]
fn test_format_preview() {
    let output = lakeship(&["format", "FMDay, DD MON YYYY"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("preview:  Tuesday, 05 MAR 2024"), "{}", text);
}

#[test]
fn test_format_rejects_unmapped_template() {
    let output = lakeship(&["format", "YYYY TZ"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no DuckDB equivalent"));
}
