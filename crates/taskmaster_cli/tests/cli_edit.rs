use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskmaster-{nanos}-{name}"))
}

fn write_store(store_dir: &Path, tasks: serde_json::Value) {
    std::fs::create_dir_all(store_dir).unwrap();
    std::fs::write(
        store_dir.join("taskmaster-tasks.json"),
        serde_json::to_string(&tasks).unwrap(),
    )
    .unwrap();
}

fn stored(store_dir: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(store_dir.join("taskmaster-tasks.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn run(store_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskmaster"))
        .args(args)
        .env("TASKMASTER_STORE_DIR", store_dir)
        .env("TASKMASTER_CONFIG_PATH", store_dir.join("missing-config.json"))
        .env("TASKMASTER_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run taskmaster")
}

fn seed() -> serde_json::Value {
    serde_json::json!([
        { "id": 2, "text": "Walk dog", "completed": false, "createdAt": "2025-12-20T08:31:00Z" },
        { "id": 1, "text": "Buy milk", "completed": true, "createdAt": "2025-12-20T08:30:00Z" }
    ])
}

#[test]
fn edit_with_text_stores_trimmed_value() {
    let store_dir = temp_path("cli-edit");
    write_store(&store_dir, seed());

    let output = run(&store_dir, &["edit", "1", "  Buy oat milk  "]);
    let tasks = stored(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Updated task: Buy oat milk (1)"));
    assert_eq!(tasks[1]["text"], "Buy oat milk");
    assert_eq!(tasks[1]["completed"], true);
    assert_eq!(tasks[1]["createdAt"], "2025-12-20T08:30:00Z");
}

#[test]
fn edit_with_blank_text_keeps_original() {
    let store_dir = temp_path("cli-edit-blank");
    write_store(&store_dir, seed());

    let output = run(&store_dir, &["edit", "1", "   "]);
    let tasks = stored(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(tasks, seed());
}

#[test]
fn edit_without_text_shows_editing_row() {
    let store_dir = temp_path("cli-edit-start");
    write_store(&store_dir, seed());

    let output = run(&store_dir, &["edit", "2"]);
    std::fs::remove_dir_all(&store_dir).ok();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[ ] > Walk dog (2) editing [save | cancel]"));
    assert!(stdout.contains("[x] Buy milk (1) [edit | delete]"));
}

#[test]
fn one_shot_save_explains_missing_edit_session() {
    let store_dir = temp_path("cli-edit-save");
    write_store(&store_dir, seed());

    let output = run(&store_dir, &["save", "renamed"]);
    let tasks = stored(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No task is being edited"));
    assert_eq!(tasks, seed());
}
