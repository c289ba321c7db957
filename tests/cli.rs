//! End-to-end tests against the `tg` binary.
//!
//! Every test runs with its own `TG_HOME`, no API key in the environment,
//! and zero simulated latency, except the concurrency tests, which keep a
//! slow breakdown running in a second process.

use assert_cmd::Command;
use serde_json::Value;
use std::process::{Child, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn tg(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tg").unwrap();
    cmd.env("TG_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("TG_BOARD")
        .env_remove("TG_MODEL")
        .env_remove("RUST_LOG")
        .arg("--no-delay");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Start `tg task generate` in the background with a three second breakdown.
fn spawn_slow_generate(home: &TempDir, task_id: &str) -> Child {
    std::fs::write(
        home.path().join("config.json"),
        r#"{"latency":{"breakdown_ms":3000}}"#,
    )
    .unwrap();

    std::process::Command::new(assert_cmd::cargo::cargo_bin("tg"))
        .env("TG_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env_remove("TG_BOARD")
        .env_remove("TG_MODEL")
        .env_remove("TG_NO_DELAY")
        .env_remove("RUST_LOG")
        .args(["--json", "task", "generate", task_id])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

fn column_ids(board: &Value, status: &str) -> Vec<String> {
    board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["status"] == status)
        .unwrap()["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn fresh_board_is_seeded() {
    let home = TempDir::new().unwrap();

    let tasks = json_stdout(tg(&home).args(["task", "list"]));
    assert_eq!(tasks["count"], 2);
    assert_eq!(tasks["tasks"][0]["id"], "task_1");

    let board = json_stdout(tg(&home).arg("board"));
    assert_eq!(board["total"], 8);
    assert_eq!(column_ids(&board, "In Progress"), vec!["ticket_3", "ticket_7"]);
}

#[test]
fn create_without_key_adds_default_ticket() {
    let home = TempDir::new().unwrap();

    let created = json_stdout(tg(&home).args(["task", "create", "Launch blog", "-d", "Weekly posts"]));
    assert_eq!(created["generated"], false);
    assert!(created["notice"].is_string());

    let tickets = created["task"]["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["status"], "To Do");
    assert_eq!(tickets[0]["priority"], 1);

    // Persisted for the next run
    let tasks = json_stdout(tg(&home).args(["task", "list"]));
    assert_eq!(tasks["count"], 3);
}

#[test]
fn create_with_key_generates_five_tickets() {
    let home = TempDir::new().unwrap();

    let created = json_stdout(
        tg(&home)
            .env("GEMINI_API_KEY", "test-key")
            .args(["task", "create", "Launch blog"]),
    );
    assert_eq!(created["generated"], true);

    let tickets = created["task"]["tickets"].as_array().unwrap();
    let priorities: Vec<u64> = tickets.iter().map(|t| t["priority"].as_u64().unwrap()).collect();
    assert_eq!(priorities, vec![1, 2, 2, 3, 3]);
    assert_eq!(tickets[0]["title"], "Research for Launch blog");
}

#[test]
fn seed_is_written_once() {
    let home = TempDir::new().unwrap();

    let first = json_stdout(tg(&home).args(["task", "list"]));
    assert!(home.path().join("board.json").exists());

    let second = json_stdout(tg(&home).args(["task", "list"]));
    assert_eq!(first["tasks"][0]["created_at"], second["tasks"][0]["created_at"]);
}

#[test]
fn blank_title_rejected() {
    let home = TempDir::new().unwrap();
    let output = tg(&home).args(["task", "create", "   "]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn generate_without_key_is_missing_credential() {
    let home = TempDir::new().unwrap();

    let output = tg(&home).args(["task", "generate", "task_1", "--json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(7));

    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["code"], "MISSING_CREDENTIAL");
}

#[test]
fn generate_unknown_task_suggests_ids() {
    let home = TempDir::new().unwrap();

    let output = tg(&home)
        .env("GEMINI_API_KEY", "test-key")
        .args(["task", "generate", "task_3", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["code"], "TASK_NOT_FOUND");
    assert!(err["error"]["hint"].as_str().unwrap().contains("task_1"));
}

#[test]
fn ticket_move_round_trip() {
    let home = TempDir::new().unwrap();
    let before = column_ids(&json_stdout(tg(&home).arg("board")), "To Do");

    let moved = json_stdout(tg(&home).args(["ticket", "move", "ticket_2", "done"]));
    assert_eq!(moved["from"], "To Do");
    assert_eq!(moved["to"], "Done");

    let board = json_stdout(tg(&home).arg("board"));
    assert!(column_ids(&board, "Done").contains(&"ticket_2".to_string()));

    json_stdout(tg(&home).args(["ticket", "move", "ticket_2", "todo"]));
    let board = json_stdout(tg(&home).arg("board"));
    assert_eq!(column_ids(&board, "To Do"), before);
    assert_eq!(board["total"], 8);
}

#[test]
fn ticket_move_rejects_bad_input() {
    let home = TempDir::new().unwrap();

    let bad_status = tg(&home).args(["ticket", "move", "ticket_2", "blocked"]).output().unwrap();
    assert_eq!(bad_status.status.code(), Some(4));

    let unknown = tg(&home).args(["ticket", "move", "ticket_99", "done"]).output().unwrap();
    assert_eq!(unknown.status.code(), Some(3));
}

#[test]
fn group_strategy_and_fallback() {
    let home = TempDir::new().unwrap();

    let groups = json_stdout(tg(&home).args(["group", "list"]));
    assert_eq!(groups["count"], 4);
    assert_eq!(groups["groups"][0]["label"], "UI Design Tasks");

    let known = json_stdout(tg(&home).args(["group", "strategy", "UI Design Tasks"]));
    assert!(known["strategy"].as_str().unwrap().contains("homepage layout first"));

    let unknown = json_stdout(tg(&home).args(["group", "strategy", "Nonexistent Group"]));
    assert_eq!(unknown["strategy"], "No specific strategy available for this group.");
}

#[test]
fn reuse_search() {
    let home = TempDir::new().unwrap();

    let results = json_stdout(tg(&home).args(["reuse", "a landing page with a form"]));
    assert_eq!(results["count"], 2);
    assert_eq!(results["results"][0]["ticket_id"], "ticket_1");
    assert_eq!(results["results"][0]["relevance_score"], 8);

    let blank = tg(&home).args(["reuse", ""]).output().unwrap();
    assert_eq!(blank.status.code(), Some(4));
}

#[test]
fn key_set_status_clear() {
    let home = TempDir::new().unwrap();

    let status = json_stdout(tg(&home).args(["key", "status"]));
    assert_eq!(status["configured"], false);

    json_stdout(tg(&home).args(["key", "set", "abcd1234efgh"]));
    let status = json_stdout(tg(&home).args(["key", "status"]));
    assert_eq!(status["configured"], true);
    assert_eq!(status["source"], "config");
    assert!(!status["key"].as_str().unwrap().contains("abcd1234efgh"));

    // A saved key makes new tasks start from a breakdown
    let created = json_stdout(tg(&home).args(["task", "create", "Ship docs"]));
    assert_eq!(created["task"]["tickets"].as_array().unwrap().len(), 5);

    let cleared = json_stdout(tg(&home).args(["key", "clear"]));
    assert_eq!(cleared["changed"], true);
    let status = json_stdout(tg(&home).args(["key", "status"]));
    assert_eq!(status["configured"], false);
}

#[test]
fn reset_restores_seed() {
    let home = TempDir::new().unwrap();

    json_stdout(tg(&home).args(["task", "create", "Temporary"]));
    json_stdout(tg(&home).args(["reset", "--empty"]));
    assert_eq!(json_stdout(tg(&home).args(["task", "list"]))["count"], 0);

    json_stdout(tg(&home).arg("reset"));
    assert_eq!(json_stdout(tg(&home).args(["task", "list"]))["count"], 2);
}

#[test]
fn explicit_board_path() {
    let home = TempDir::new().unwrap();
    let board = home.path().join("elsewhere.json");

    json_stdout(tg(&home).arg("--board").arg(&board).args(["reset", "--empty"]));
    assert!(board.exists());
    assert!(!home.path().join("board.json").exists());
}

#[test]
fn move_during_generate_is_kept() {
    let home = TempDir::new().unwrap();
    json_stdout(tg(&home).args(["task", "list"]));

    let generate = spawn_slow_generate(&home, "task_2");
    thread::sleep(Duration::from_millis(700));
    json_stdout(tg(&home).args(["ticket", "move", "ticket_2", "done"]));

    let output = generate.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let board = json_stdout(tg(&home).arg("board"));
    assert!(column_ids(&board, "Done").contains(&"ticket_2".to_string()));
    let task = json_stdout(tg(&home).args(["task", "show", "task_2"]));
    assert_eq!(task["tickets"].as_array().unwrap().len(), 5);
}

#[test]
fn overlapping_generate_across_processes_rejected() {
    let home = TempDir::new().unwrap();
    json_stdout(tg(&home).args(["task", "list"]));

    let first = spawn_slow_generate(&home, "task_2");
    thread::sleep(Duration::from_millis(700));

    let second = tg(&home)
        .env("GEMINI_API_KEY", "test-key")
        .args(["task", "generate", "task_2", "--json"])
        .output()
        .unwrap();
    assert_eq!(second.status.code(), Some(9));
    let err: Value = serde_json::from_slice(&second.stderr).unwrap();
    assert_eq!(err["error"]["code"], "GENERATION_IN_PROGRESS");

    let output = first.wait_with_output().unwrap();
    assert!(output.status.success());
    let generated: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(generated["count"], 5);

    // Marker released: the next run goes through
    json_stdout(tg(&home).env("GEMINI_API_KEY", "test-key").args(["task", "generate", "task_2"]));
}
