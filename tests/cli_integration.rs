mod common;

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use common::Workspace;
use indoc::indoc;
use std::fs;

fn odcvmap() -> Command {
    Command::from_std(std::process::Command::new(env!("CARGO_BIN_EXE_odcvmap")))
}

fn stdout(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

fn stderr(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn test_run_writes_dataset_and_backup() {
    let ws = Workspace::new();
    let original = ws.read_data();

    let assert = odcvmap()
        .current_dir(ws.dir.path())
        .arg("run")
        .arg(&ws.data)
        .assert()
        .success();
    let out = stdout(&assert);
    assert!(out.contains("Stage summary"));
    assert!(out.contains("efficiency_score"));

    assert!(ws.read_data().contains("odcv_hvac_savings_pct"));
    let backups = ws.backups();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), original);
}

#[test]
fn test_dry_run_leaves_file_untouched() {
    let ws = Workspace::new();
    let original = ws.read_data();

    let assert = odcvmap()
        .current_dir(ws.dir.path())
        .args(["run", "--dry-run"])
        .arg(&ws.data)
        .assert()
        .success();
    assert!(stdout(&assert).contains("Dry run"));

    assert_eq!(ws.read_data(), original);
    assert!(ws.backups().is_empty());
}

#[test]
fn test_save_each_backs_up_every_stage() {
    let ws = Workspace::new();
    let backup_dir = ws.dir.path().join("snapshots");

    odcvmap()
        .current_dir(ws.dir.path())
        .args(["run", "--save-each", "--stage", "verticals", "--stage", "occupancy"])
        .arg(&ws.data)
        .arg("--backup-dir")
        .arg(&backup_dir)
        .assert()
        .success();

    assert_eq!(common::list_files(&backup_dir).len(), 2);
}

#[test]
fn test_unknown_stage_fails() {
    let ws = Workspace::new();
    let assert = odcvmap()
        .current_dir(ws.dir.path())
        .args(["run", "--stage", "teleport"])
        .arg(&ws.data)
        .assert()
        .failure()
        .code(1);
    assert!(stderr(&assert).contains("unknown stage 'teleport'"));
}

#[test]
fn test_missing_dataset_fails() {
    let ws = Workspace::new();
    let assert = odcvmap()
        .current_dir(ws.dir.path())
        .args(["run", "missing.csv"])
        .assert()
        .failure()
        .code(1);
    assert!(stderr(&assert).contains("dataset not found"));
}

#[test]
fn test_dependency_error_leaves_file_untouched() {
    let ws = Workspace::new();
    let original = ws.read_data();
    let assert = odcvmap()
        .current_dir(ws.dir.path())
        .args(["run", "--stage", "carbon"])
        .arg(&ws.data)
        .assert()
        .failure();
    assert!(stderr(&assert).contains("produced by post_odcv_energy"));
    assert_eq!(ws.read_data(), original);
}

#[test]
fn test_overrides_from_config() {
    let ws = Workspace::new();
    ws.write(
        "overrides.csv",
        indoc! {"
            id_building,val_current_usd
            B3,999
        "},
    );
    let overrides = ws.dir.path().join("overrides.csv");
    let config = ws.write(
        "custom.toml",
        &format!("[data]\noverrides = {:?}\n", overrides.display().to_string()),
    );

    odcvmap()
        .current_dir(ws.dir.path())
        .arg("run")
        .arg(&ws.data)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let dataset = ws.load();
    assert_eq!(common::number(&dataset, "B3", "val_current_usd"), Some(999.0));
}

#[test]
fn test_stages_lists_catalogue() {
    let assert = odcvmap().arg("stages").assert().success();
    let out = stdout(&assert);
    assert!(out.contains("post_odcv_energy"));
    assert!(out.contains("overrides"));
}

#[test]
fn test_init_creates_config_once() {
    let ws = Workspace::new();
    odcvmap().current_dir(ws.dir.path()).arg("init").assert().success();
    assert!(ws.dir.path().join(".odcvmap.toml").exists());

    let assert = odcvmap()
        .current_dir(ws.dir.path())
        .arg("init")
        .assert()
        .failure();
    assert!(stderr(&assert).contains("already exists"));

    odcvmap()
        .current_dir(ws.dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
