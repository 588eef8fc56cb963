//! `scene-check` binary: exit status and output for good and bad documents.

use std::path::PathBuf;
use std::process::{Command, Output};

fn write_temp(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("blockcad-check-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn run_check(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scene-check"))
        .args(args)
        .output()
        .expect("spawn scene-check")
}

#[test]
fn test_scene_check_valid_document() {
    let path = write_temp(
        r#"{"items": [{"kind": "box", "params": {"w": 1, "h": 1, "d": 1}, "position": [0, 0.5, 0]}],
            "selection": {"type": "shape"}}"#,
    );
    let path_str = path.to_string_lossy().to_string();
    let out = run_check(&[&path_str]);
    let _ = std::fs::remove_file(&path);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim_end(), format!("OK: {path_str}"));
}

#[test]
fn test_scene_check_reports_item_errors() {
    let path = write_temp(r#"{"items": [{"position": [0, 0]}]}"#);
    let path_str = path.to_string_lossy().to_string();
    let out = run_check(&[&path_str]);
    let _ = std::fs::remove_file(&path);

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("items[0]: missing `kind`"), "{stderr}");
    assert!(stderr.contains("position"), "{stderr}");
}

#[test]
fn test_scene_check_missing_items() {
    let path = write_temp(r#"{"selection": null}"#);
    let path_str = path.to_string_lossy().to_string();
    let out = run_check(&[&path_str]);
    let _ = std::fs::remove_file(&path);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("`items` must be an array"));
}

#[test]
fn test_scene_check_invalid_json_and_unreadable_file() {
    let path = write_temp("{not json");
    let path_str = path.to_string_lossy().to_string();
    let out = run_check(&[&path_str]);
    let _ = std::fs::remove_file(&path);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid JSON"));

    let missing = std::env::temp_dir().join(format!("blockcad-absent-{}.json", uuid::Uuid::new_v4()));
    let out = run_check(&[&missing.to_string_lossy()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot read"));
}

#[test]
fn test_scene_check_without_argument_prints_usage() {
    let out = run_check(&[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("usage: scene-check <path>"));
}
