use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn padclip(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("padclip").unwrap();
    cmd.env("PADCLIP_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--user")
        .arg("tester");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_paste_reverses_and_consumes_selection() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["pad", "tab_1"]).assert().success();
    padclip(home.path())
        .args(["select", "tt_content", "5", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 2 on tab_1"));

    let batch = stdout_json(padclip(home.path()).args(["paste", "pages|30"]));
    let ids: Vec<&String> = batch["tt_content"].as_object().unwrap().keys().collect();
    assert_eq!(ids, vec!["7", "5"]);
    assert_eq!(batch["tt_content"]["5"]["move"], 30);

    padclip(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing selected."));
}

#[test]
fn test_default_pad_keeps_last_selection() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path())
        .args(["select", "pages", "1", "2", "3"])
        .assert()
        .success();

    padclip(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pages|3"))
        .stdout(predicate::str::contains("pages|1").not());
}

#[test]
fn test_copy_mode_keeps_selection_and_carries_update() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["pad", "tab_2"]).assert().success();
    padclip(home.path()).args(["select", "pages", "4"]).assert().success();
    padclip(home.path()).args(["mode", "copy"]).assert().success();

    let batch = stdout_json(padclip(home.path()).args([
        "paste",
        "pages|-12",
        "--update",
        r#"{"hidden":1}"#,
    ]));
    assert_eq!(batch["pages"]["4"]["copy"]["action"], "paste");
    assert_eq!(batch["pages"]["4"]["copy"]["target"], -12);
    assert_eq!(batch["pages"]["4"]["copy"]["update"]["hidden"], 1);

    padclip(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pages|4"));
}

#[test]
fn test_negative_target_without_schema_is_skipped() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["pad", "tab_1"]).assert().success();
    padclip(home.path()).args(["select", "pages", "4"]).assert().success();

    let batch = stdout_json(padclip(home.path()).args(["paste", "|-5"]));
    assert_eq!(batch, serde_json::json!({}));

    padclip(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pages|4"));
}

#[test]
fn test_copy_mode_needs_items() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path())
        .args(["mode", "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode stays move"));
}

#[test]
fn test_lock_keeps_chosen_pad() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["pad", "tab_2"]).assert().success();
    padclip(home.path())
        .args(["--lock", "select", "pages", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 1 on normal"));

    padclip(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("* tab_2"));
}

#[test]
fn test_session_and_persistent_scopes() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["select", "pages", "1"]).assert().success();
    assert!(home.path().join("session/clipboard-tester.json").exists());
    assert!(!home.path().join("data/clipboard-tester.json").exists());

    padclip(home.path())
        .args(["config", "persistent", "true"])
        .assert()
        .success();
    padclip(home.path()).args(["select", "pages", "2"]).assert().success();
    assert!(home.path().join("data/clipboard-tester.json").exists());
}

#[test]
fn test_file_selection_delete_and_prune() {
    let home = tempfile::tempdir().unwrap();
    let existing = home.path().join("a.txt");
    std::fs::write(&existing, "a").unwrap();
    let existing = existing.to_str().unwrap().to_string();
    let missing = home.path().join("gone.txt").to_str().unwrap().to_string();

    padclip(home.path()).args(["pad", "tab_1"]).assert().success();
    padclip(home.path())
        .args(["select-file", existing.as_str(), missing.as_str()])
        .assert()
        .success();

    padclip(home.path())
        .arg("prune")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned 1"));

    let batch = stdout_json(padclip(home.path()).args(["delete", "--files"]));
    assert_eq!(batch["delete"][0]["data"], existing.as_str());
    assert_eq!(batch["delete"].as_array().unwrap().len(), 1);
}

#[test]
fn test_paste_files_uses_target_after_marker() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["pad", "tab_1"]).assert().success();
    padclip(home.path())
        .args(["select-file", "/srv/one.txt", "/srv/two.txt"])
        .assert()
        .success();

    let batch = stdout_json(padclip(home.path()).args(["paste-files", "_FILE|1:/dest/"]));
    assert_eq!(batch["move"][0]["data"], "/srv/one.txt");
    assert_eq!(batch["move"][1]["data"], "/srv/two.txt");
    assert_eq!(batch["move"][1]["target"], "1:/dest/");
}

#[test]
fn test_config_get_and_set() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path())
        .args(["config", "pads", "5"])
        .assert()
        .success();

    padclip(home.path())
        .args(["config", "pads"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pads = 5"));

    padclip(home.path())
        .args(["config", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_invalid_key_is_reported() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path())
        .args(["remove", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid selection key"));
}

#[test]
fn test_file_marker_is_not_a_record_schema() {
    let home = tempfile::tempdir().unwrap();

    padclip(home.path()).args(["pad", "tab_1"]).assert().success();
    padclip(home.path())
        .args(["select", "_FILE", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("use select-file"));

    let batch = stdout_json(padclip(home.path()).args(["delete", "--files"]));
    assert_eq!(batch, serde_json::json!({}));
}

#[test]
fn test_failed_prune_keeps_pruned_entries() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("gone.txt").to_str().unwrap().to_string();
    let unreadable = home
        .path()
        .join("x".repeat(300))
        .to_str()
        .unwrap()
        .to_string();

    padclip(home.path()).args(["pad", "tab_1"]).assert().success();
    padclip(home.path())
        .args(["select-file", missing.as_str(), unreadable.as_str()])
        .assert()
        .success();

    padclip(home.path()).arg("prune").assert().failure();

    padclip(home.path())
        .args(["list", "--files"])
        .assert()
        .success()
        .stdout(predicate::str::contains(unreadable.as_str()))
        .stdout(predicate::str::contains("gone.txt").not());
}
