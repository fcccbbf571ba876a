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
fn export_writes_dated_pretty_json() {
    let store_dir = temp_path("cli-export-store");
    let export_dir = temp_path("cli-export-out");
    write_store(&store_dir, seed());

    let today = time::OffsetDateTime::now_utc().date();
    let expected = export_dir.join(format!(
        "tasks-{:04}-{:02}-{:02}.json",
        today.year(),
        u8::from(today.month()),
        today.day()
    ));

    let output = run(
        &store_dir,
        &["export", "--dir", export_dir.to_str().unwrap()],
    );
    let content = std::fs::read_to_string(&expected).unwrap();
    std::fs::remove_dir_all(&store_dir).ok();
    std::fs::remove_dir_all(&export_dir).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Exported 2 task(s) to"));
    assert!(content.contains("\n  {\n    \"id\": 2,"));
    let exported: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(exported, seed());
}
