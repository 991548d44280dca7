//! Ensure CLI command failures honor `--output json`.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn dx_cmd() -> Command {
    Command::new(cargo::cargo_bin!("dx"))
}

fn write_temp_json(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("response.json");
    fs::write(&path, content).expect("write temp json");
    (dir, path.to_string_lossy().to_string())
}

fn envelope(args: &[&str]) -> serde_json::Value {
    let output = dx_cmd()
        .args(args)
        .args(["--output", "json"])
        .output()
        .expect("run dx");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json envelope");
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "command_failed");
    json
}

#[test]
fn missing_file_emits_json_error_envelope() {
    let json = envelope(&["inspect", "nope-does-not-exist.json"]);
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to read")),
        "unexpected message: {}",
        json["message"]
    );
    assert!(json.get("code").is_none());
}

#[test]
fn non_json_body_reports_malformed_input_code() {
    let (_dir, path) = write_temp_json("<html>");
    let json = envelope(&["inspect", &path]);
    assert_eq!(json["code"], "DX1001");
}

#[test]
fn unsupported_root_context_reports_code() {
    let (_dir, path) = write_temp_json(
        r#"{
            "data": {"caseInfo": {
                "ID": "C-9", "businessID": "C-9", "caseTypeID": "Case", "caseTypeName": "Case",
                "createTime": "", "createdBy": "", "lastUpdateTime": "", "lastUpdatedBy": "",
                "name": "Case", "owner": "", "status": "New",
                "content": {"classID": "Case"}
            }},
            "uiResources": {
                "resources": {"views": {}},
                "root": {"config": {"context": "caseInfo.other", "name": "MainView", "type": "view"}}
            }
        }"#,
    );
    let json = envelope(&["inspect", &path]);
    assert_eq!(json["code"], "DX1302");
}

#[test]
fn fields_without_ui_resources_fails() {
    let (_dir, path) = write_temp_json(
        r#"{"data": {"caseInfo": {
            "ID": "C-9", "businessID": "C-9", "caseTypeID": "Case", "caseTypeName": "Case",
            "createTime": "", "createdBy": "", "lastUpdateTime": "", "lastUpdatedBy": "",
            "name": "Case", "owner": "", "status": "New"
        }}}"#,
    );
    let json = envelope(&["fields", &path]);
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("uiResources")),
        "unexpected message: {}",
        json["message"]
    );
}
