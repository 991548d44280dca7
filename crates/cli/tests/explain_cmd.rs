//! CLI tests for the `dx explain` subcommand.

use std::process::Command;

use assert_cmd::cargo;

fn dx_cmd() -> Command {
    Command::new(cargo::cargo_bin!("dx"))
}

#[test]
fn explain_known_code_json_returns_explanation() {
    let output = dx_cmd()
        .args(["explain", "DX1401", "--output", "json"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["id"], "DX1401");
    assert!(json["explanation"].is_string());
}

#[test]
fn explain_unknown_code_json_returns_null_explanation() {
    let output = dx_cmd()
        .args(["explain", "DX9999", "--output", "json"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["id"], "DX9999");
    assert!(json["explanation"].is_null());
}

#[test]
fn explain_pretty_shows_human_readable_text() {
    let output = dx_cmd()
        .args(["explain", "DX1305", "--output", "pretty"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("DX1305") && stdout.contains(':'),
        "unexpected output: {stdout}"
    );
}

#[test]
fn every_emitted_code_explains_through_the_binary() {
    for code in dx_explorer_diagnostics::codes::ALL {
        let output = dx_cmd()
            .args(["explain", *code, "--output", "json"])
            .output()
            .expect("run explain command");

        assert!(output.status.success(), "{code}");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
        assert_eq!(json["id"], *code);
        assert!(
            json["explanation"].as_str().is_some_and(|e| !e.trim().is_empty()),
            "{code} has no explanation"
        );
    }
}
