//! Tests for the `screensnap` binary using the mock backend

use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn screensnap(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_screensnap"))
        .arg("--mock")
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run screensnap")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn saved_path(output: &Output) -> PathBuf {
    let out = stdout(output);
    let path = out
        .trim()
        .strip_prefix("Screenshot saved to: ")
        .unwrap_or_else(|| panic!("unexpected stdout: {}", out));
    PathBuf::from(path)
}

#[test]
fn test_capture_prints_absolute_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");
    let out = dir.path().join("shots");

    let output = screensnap(&config, &["shot", "-o", out.to_str().unwrap(), "-f", "jpg"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let path = saved_path(&output);
    assert!(path.is_absolute());
    assert!(path.ends_with("shot.jpg"));
    assert!(path.exists());
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_invalid_format_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");

    let output = screensnap(
        &config,
        &["-o", dir.path().to_str().unwrap(), "-f", "gif"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("Error: Invalid format 'gif'"), "{}", err);
    assert!(err.contains("Hint:"), "{}", err);
}

#[test]
fn test_traversal_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");

    let output = screensnap(
        &config,
        &["../escape.png", "-o", dir.path().to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("path components not allowed"));
}

#[test]
fn test_window_fallback_prints_warning() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");

    let output = screensnap(
        &config,
        &["-w", "No Such Window", "-o", dir.path().to_str().unwrap()],
    );

    assert!(output.status.success());
    let err = stderr(&output);
    assert!(
        err.contains("Warning: Window 'No Such Window' not found, capturing full screen"),
        "{}",
        err
    );
    assert!(saved_path(&output).exists());
}

#[test]
fn test_preferences_supply_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");
    let out = dir.path().join("from-prefs");

    std::fs::write(
        &config,
        format!(
            r#"{{"output_dir": {:?}, "format": "jpeg", "include_timestamp": false}}"#,
            out.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = screensnap(&config, &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let path = saved_path(&output);
    assert!(path.ends_with("screenshot_1.jpeg"), "{}", path.display());
    assert!(path.starts_with(std::path::absolute(&out).unwrap()));
}

#[test]
fn test_flags_override_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");
    std::fs::write(&config, r#"{"format": "jpeg"}"#).unwrap();

    let output = screensnap(
        &config,
        &["flag", "-f", "png", "-o", dir.path().to_str().unwrap()],
    );

    assert!(output.status.success());
    assert!(saved_path(&output).ends_with("flag.png"));
}

#[test]
fn test_corrupt_preferences_are_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");
    std::fs::write(&config, "{{{{").unwrap();

    let output = screensnap(&config, &["ok", "-o", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert!(saved_path(&output).ends_with("ok.png"));
}

#[test]
fn test_save_config_writes_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("saved").join(".screensnaprc");

    let output = screensnap(&config, &["--save-config", "-f", "JPG", "-o", "captures"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["format"], "jpg");
    assert_eq!(saved["output_dir"], "captures");
    assert_eq!(saved["include_timestamp"], true);
    assert_eq!(saved["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_list_windows_with_mock() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefs.json");

    let output = screensnap(&config, &["--list-windows"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Found 3 windows"), "{}", out);
    assert!(out.contains("Visual Studio Code"));
}
