use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn lifequest(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lifequest").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn init(dir: &TempDir) {
    lifequest(dir).arg("init").assert().success();
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn commands_fail_cleanly_outside_a_workspace() {
    let dir = TempDir::new().unwrap();
    lifequest(&dir)
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not_initialized"));
}

#[test]
fn init_is_idempotent_about_refusing_reinit() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    lifequest(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already_initialized"));
}

#[test]
fn add_toggle_and_list_round_trip() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    let out = lifequest(&dir)
        .args(["add", "Hand in essay", "--due", "2099-01-01"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let task = stdout_json(&out);
    assert_eq!(task["title"], "Hand in essay");
    assert_eq!(task["due_date"], "2099-01-01");
    assert_eq!(task["done"], false);
    let id = task["id"].as_str().unwrap().to_string();

    // Toggle by id prefix.
    let out = lifequest(&dir)
        .args(["toggle", &id[..8]])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let toggled = stdout_json(&out);
    assert_eq!(toggled["done"], true);
    // Toggling must not disturb the due date.
    assert_eq!(toggled["due_date"], "2099-01-01");

    let out = lifequest(&dir)
        .args(["list", "--done"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listed = stdout_json(&out);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    lifequest(&dir)
        .args(["list", "--pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn add_rejects_blank_titles() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    lifequest(&dir)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty_title"));
}

#[test]
fn add_rejects_bad_repeat_specs() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    lifequest(&dir)
        .args(["add", "Gym", "--repeat", "200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_repeat_mask"));
    lifequest(&dir)
        .args(["add", "Gym", "--repeat", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_repeat_spec"));
}

#[test]
fn today_reports_buckets_and_progress() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    lifequest(&dir).args(["add", "One-off for today"]).assert().success();
    lifequest(&dir)
        .args(["add", "Old chore", "--due", "2020-01-01"])
        .assert()
        .success();

    let out = lifequest(&dir)
        .arg("today")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let dash = stdout_json(&out);
    assert_eq!(dash["overdue"].as_array().unwrap().len(), 1);
    assert_eq!(dash["today_pending"].as_array().unwrap().len(), 1);
    assert_eq!(dash["total_today"], 1);
    assert_eq!(dash["progress_percent"], 0);
}

#[test]
fn calendar_emits_42_cells() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    lifequest(&dir)
        .args(["add", "Standup", "--repeat", "weekdays"])
        .assert()
        .success();

    let out = lifequest(&dir)
        .args(["calendar", "--month", "2099-06"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let cal = stdout_json(&out);
    assert_eq!(cal["month"], "2099-06");
    let cells = cal["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 42);
    // A weekday-repeat quest fills future weekdays of that month.
    let busy = cells.iter().filter(|c| c["total"] == 1).count();
    assert!(busy > 0);
}

#[test]
fn goal_lifecycle_over_the_cli() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    let out = lifequest(&dir)
        .args(["goal", "add", "Read 5 books", "--scope", "long", "--target", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let goal = stdout_json(&out);
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let out = lifequest(&dir)
        .args(["add", "Finish chapter", "--goal", &goal_id[..8]])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let task = stdout_json(&out);
    assert_eq!(task["goal_id"].as_str().unwrap(), goal_id);
    let task_id = task["id"].as_str().unwrap().to_string();

    lifequest(&dir).args(["toggle", &task_id]).assert().success();

    let out = lifequest(&dir)
        .args(["goal", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let goals = stdout_json(&out);
    assert_eq!(goals[0]["achieved_count"], 1);

    lifequest(&dir)
        .args(["goal", "delete", &goal_id])
        .assert()
        .success();
    let out = lifequest(&dir)
        .args(["show", &task_id])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let shown = stdout_json(&out);
    assert!(shown.get("goal_id").is_none() || shown["goal_id"].is_null());
}

#[test]
fn profile_accumulates_xp_from_completions() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    for i in 0..3 {
        let out = lifequest(&dir)
            .args(["add", &format!("Quest {i}")])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let id = stdout_json(&out)["id"].as_str().unwrap().to_string();
        lifequest(&dir).args(["toggle", &id]).assert().success();
    }

    let out = lifequest(&dir)
        .arg("profile")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let profile = stdout_json(&out);
    assert_eq!(profile["xp"], 30);
    assert_eq!(profile["level"], 1);
}

#[test]
fn pretty_format_renders_human_output() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    lifequest(&dir)
        .args(["add", "Readable quest", "--due", "2099-01-01"])
        .assert()
        .success();
    lifequest(&dir)
        .args(["--pretty", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Readable quest"))
        .stdout(predicate::str::contains("due: 2099-01-01"));
}
