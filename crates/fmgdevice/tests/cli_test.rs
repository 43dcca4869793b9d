//! Integration tests for the `fmgdevice` CLI binary.
//!
//! Argument parsing, the resource catalogue and the offline conversions,
//! all without a live FortiManager.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fmgdevice` binary with env isolation.
///
/// Clears all `FMG_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn fmg_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fmgdevice");
    cmd.env("HOME", "/tmp/fmgdevice-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/fmgdevice-cli-test-nonexistent")
        .env_remove("FMG_PROFILE")
        .env_remove("FMG_URL")
        .env_remove("FMG_TOKEN")
        .env_remove("FMG_ADOM")
        .env_remove("FMG_DEVICE")
        .env_remove("FMG_VDOM")
        .env_remove("FMG_OUTPUT")
        .env_remove("FMG_INSECURE")
        .env_remove("FMG_TIMEOUT")
        .env_remove("FMG_USERNAME")
        .env_remove("FMG_PASSWORD");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).unwrap();
    path.display().to_string()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = fmg_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    fmg_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("FortiManager")
            .and(predicate::str::contains("resources"))
            .and(predicate::str::contains("import"))
            .and(predicate::str::contains("flatten")),
    );
}

#[test]
fn test_version_flag() {
    fmg_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fmgdevice"));
}

#[test]
fn test_completions_bash() {
    fmg_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Resource catalogue ──────────────────────────────────────────────

#[test]
fn test_resources_list_plain() {
    fmg_cmd()
        .args(["resources", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("fmgdevice_router_bfd\n")
                .and(predicate::str::contains("fmgdevice_router_static"))
                .and(predicate::str::contains("fmgdevice_user_radius")),
        );
}

#[test]
fn test_resources_list_json() {
    let output = fmg_cmd()
        .args(["resources", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let list = stdout_json(&output);
    let bfd = list
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["type_name"] == "fmgdevice_router_bfd")
        .unwrap();
    assert_eq!(bfd["label"], "RouterBfd");
    assert_eq!(bfd["key"]["kind"], "singleton");
}

#[test]
fn test_resources_schema_shows_nested_fields() {
    fmg_cmd()
        .args(["resources", "schema", "switch_controller_qos_queue_policy", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("rate_by")
                .and(predicate::str::contains("cos_queue.name")),
        );
}

#[test]
fn test_unknown_resource_is_usage_error() {
    let output = fmg_cmd()
        .args(["resources", "schema", "router_ospf"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("router_ospf"));
}

// ── Offline conversions ─────────────────────────────────────────────

#[test]
fn test_expand_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = write_json(
        dir.path(),
        "dot1p.json",
        &json!({
            "id": "voice",
            "attributes": {
                "name": "voice",
                "description": "lab",
                "egress_pri_tagging": true,
                "device_name": "fgt1"
            }
        }),
    );

    let output = fmg_cmd()
        .args(["expand", "switch_controller_qos_dot1p_map", "-F", &state, "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    insta::with_settings!({ sort_maps => true }, {
        insta::assert_json_snapshot!(stdout_json(&output), @r#"
        {
          "description": "lab",
          "egress-pri-tagging": "enable",
          "name": "voice"
        }
        "#);
    });
}

#[test]
fn test_expand_reports_bad_attribute_path() {
    let dir = tempfile::tempdir().unwrap();
    let state = write_json(dir.path(), "static.json", &json!({"seq_num": "five"}));

    let output = fmg_cmd()
        .args(["expand", "router_static", "-F", &state])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("seq_num"));
}

#[test]
fn test_flatten_keeps_sensitive_prior_values() {
    let dir = tempfile::tempdir().unwrap();
    let object = write_json(
        dir.path(),
        "radius.json",
        &json!([{"name": "corp", "server": "10.0.0.5", "secret": ["ENC XXXX"]}]),
    );
    let prior = write_json(
        dir.path(),
        "prior.json",
        &json!({"id": "corp", "attributes": {"name": "corp", "secret": ["hunter2"]}}),
    );

    let output = fmg_cmd()
        .args(["flatten", "user_radius", "-F", &object, "--prior", &prior, "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let state = stdout_json(&output);
    assert_eq!(state["id"], "corp");
    assert_eq!(state["attributes"]["server"], "10.0.0.5");
    assert_eq!(state["attributes"]["secret"], json!(["hunter2"]));
}

#[test]
fn test_flatten_sorts_subtables_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let object = write_json(
        dir.path(),
        "policy.json",
        &json!({
            "name": "uplink",
            "cos-queue": [{"name": "voice"}, {"name": "bulk"}]
        }),
    );

    let output = fmg_cmd()
        .args([
            "flatten",
            "switch_controller_qos_queue_policy",
            "-F",
            &object,
            "--sort",
            "alphabetical",
            "-o",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let queues = &stdout_json(&output)["attributes"]["cos_queue"];
    assert_eq!(queues[0]["name"], "bulk");
    assert_eq!(queues[1]["name"], "voice");
}

// ── Connection-bound commands ───────────────────────────────────────

#[test]
fn test_read_without_config_explains_setup() {
    let dir = tempfile::tempdir().unwrap();
    let state = write_json(dir.path(), "bfd.json", &json!({}));
    let output = fmg_cmd()
        .args(["read", "router_bfd", "-F", &state])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("config init"));
}

#[test]
fn test_unknown_profile_is_reported() {
    fmg_cmd()
        .args(["status", "--profile", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}
