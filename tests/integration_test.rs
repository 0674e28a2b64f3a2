use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn planbook_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_planbook"));
    cmd.env_remove("PLANBOOK_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    planbook_cmd().current_dir(dir).args(args).output().unwrap()
}

fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "planbook {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    serde_json::from_str(&run_ok(dir, args)).unwrap()
}

fn initialized() -> TempDir {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["init"]);
    tmp
}

#[test]
fn test_init_creates_planbook_directory() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_ok(tmp.path(), &["init"]);

    assert!(stdout.contains("Initialized planbook"));
    assert!(tmp.path().join(".planbook/store.db").exists());
    assert!(tmp.path().join(".planbook/config.yaml").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = initialized();
    let output = run(tmp.path(), &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["add", "note", "Test", "--content", "x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in a planbook directory"));
}

#[test]
fn test_plan_workflow() {
    let tmp = initialized();

    let plan = run_json(
        tmp.path(),
        &[
            "add",
            "plan",
            "Write report",
            "--date",
            "2024-06-01",
            "--start",
            "09:00",
            "--priority",
            "high",
            "--json",
        ],
    );
    let id = plan["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 9);
    assert_eq!(plan["date"], "2024-06-01");
    assert_eq!(plan["startTime"], "2024-06-01T09:00:00Z");
    assert!(plan.get("endTime").is_none());

    // each invocation reopens the store from disk
    let plans = run_json(tmp.path(), &["list", "plan", "--json"]);
    assert_eq!(plans.as_array().unwrap().len(), 1);
    assert_eq!(plans[0]["title"], "Write report");
    assert_eq!(plans[0]["priority"], "high");
    assert_eq!(plans[0]["completed"], false);
    assert_eq!(plans[0]["linkedNotes"], serde_json::json!([]));

    let updated = run_json(
        tmp.path(),
        &["update", "plan", &id[..5], "--done", "--json"],
    );
    assert_eq!(updated["completed"], true);

    let stdout = run_ok(tmp.path(), &["get", "plan", &id]);
    assert!(stdout.contains("[x]"));
    assert!(stdout.contains("Write report"));
}

#[test]
fn test_list_plans_in_range() {
    let tmp = initialized();
    for (title, date) in [("before", "2024-05-31"), ("inside", "2024-06-03"), ("after", "2024-06-08")] {
        run_ok(tmp.path(), &["add", "plan", title, "--date", date]);
    }

    let plans = run_json(
        tmp.path(),
        &["list", "plans", "--from", "2024-06-01", "--to", "2024-06-07", "--json"],
    );
    let titles: Vec<&str> = plans
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["inside"]);
}

#[test]
fn test_goal_step_clamps_and_sets_status() {
    let tmp = initialized();
    let goal = run_json(
        tmp.path(),
        &["add", "goal", "Run a marathon", "--target", "2024-12-31", "--json"],
    );
    let id = goal["id"].as_str().unwrap();
    assert_eq!(goal["status"], "not-started");

    let stepped = run_json(tmp.path(), &["update", "goal", id, "--step", "10", "--json"]);
    assert_eq!(stepped["progress"], 10);
    assert_eq!(stepped["status"], "in-progress");

    let stepped = run_json(tmp.path(), &["update", "goal", id, "--step", "200", "--json"]);
    assert_eq!(stepped["progress"], 100);
    assert_eq!(stepped["status"], "completed");

    let stepped = run_json(tmp.path(), &["update", "goal", id, "--step", "-10", "--json"]);
    assert_eq!(stepped["progress"], 90);
    assert_eq!(stepped["status"], "in-progress");

    // a raw progress value is stored as given
    let raw = run_json(tmp.path(), &["update", "goal", id, "--progress", "150", "--json"]);
    assert_eq!(raw["progress"], 150);
    assert_eq!(raw["status"], "in-progress");
}

#[test]
fn test_delete_requires_force_when_not_interactive() {
    let tmp = initialized();
    let note = run_json(
        tmp.path(),
        &["add", "note", "Ideas", "--content", "more tests", "--json"],
    );
    let id = note["id"].as_str().unwrap();

    let output = run(tmp.path(), &["delete", "note", id]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));

    let stdout = run_ok(tmp.path(), &["delete", "note", id, "--force"]);
    assert!(stdout.contains("Deleted note"));

    let output = run(tmp.path(), &["delete", "note", id, "--force"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_unknown_type_is_rejected() {
    let tmp = initialized();
    let output = run(tmp.path(), &["list", "invoices"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid entity type"));
}

#[test]
fn test_transaction_keeps_soft_subscription_reference() {
    let tmp = initialized();
    let sub = run_json(
        tmp.path(),
        &[
            "add",
            "subscription",
            "Music",
            "--cost",
            "9.99",
            "--next-payment",
            "2024-07-01",
            "--json",
        ],
    );
    let sub_id = sub["id"].as_str().unwrap();

    let tx = run_json(
        tmp.path(),
        &[
            "add",
            "transaction",
            "Music June",
            "--amount",
            "9.99",
            "--date",
            "2024-06-01",
            "--type",
            "subscription",
            "--subscription",
            sub_id,
            "--json",
        ],
    );
    let tx_id = tx["id"].as_str().unwrap();
    assert_eq!(tx["subscriptionId"], sub_id);

    run_ok(tmp.path(), &["delete", "subscription", sub_id, "--force"]);
    let tx = run_json(tmp.path(), &["get", "transaction", tx_id, "--json"]);
    assert_eq!(tx["subscriptionId"], sub_id);
}

#[test]
fn test_export_import_round_trip() {
    let source = initialized();
    run_ok(
        source.path(),
        &["add", "note", "Groceries", "--content", "milk", "--tag", "home"],
    );
    run_ok(source.path(), &["add", "plan", "Shop", "--date", "2024-06-02"]);
    run_ok(source.path(), &["budget", "--monthly", "900", "--currency", "EUR"]);
    run_ok(source.path(), &["export", "--output", "."]);

    let exported: Vec<_> = std::fs::read_dir(source.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("planbook-all-export-") && name.ends_with(".json"))
        .collect();
    assert_eq!(exported.len(), 1);
    let bundle_path = source.path().join(&exported[0]);

    let target = initialized();
    run_ok(target.path(), &["add", "note", "Old", "--content", "gone soon"]);
    let report = run_json(
        target.path(),
        &[
            "import",
            bundle_path.to_str().unwrap(),
            "--mode",
            "replace",
            "--json",
        ],
    );
    // two entries plus budget settings
    assert_eq!(report["imported"], 3);

    let notes = run_json(target.path(), &["list", "notes", "--json"]);
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["title"], "Groceries");

    let budget = run_json(target.path(), &["budget", "--json"]);
    assert_eq!(budget["settings"]["monthlyBudget"], 900.0);
    assert_eq!(budget["settings"]["currency"], "EUR");
}

#[test]
fn test_import_invalid_bundle_changes_nothing() {
    let tmp = initialized();
    run_ok(tmp.path(), &["add", "note", "Keep", "--content", "me"]);
    std::fs::write(tmp.path().join("bad.json"), r#"{"version":"1.0"}"#).unwrap();

    let output = run(tmp.path(), &["import", "bad.json", "--mode", "replace"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing data object"));

    let notes = run_json(tmp.path(), &["list", "note", "--json"]);
    assert_eq!(notes.as_array().unwrap().len(), 1);
}

#[test]
fn test_import_merge_reports_message() {
    let tmp = initialized();
    std::fs::write(
        tmp.path().join("bundle.json"),
        r#"{"data":{"goals":[{"title":"Read","targetDate":"2024-09-01","status":"bogus"},{"title":"No date"}]}}"#,
    )
    .unwrap();

    let stdout = run_ok(tmp.path(), &["import", "bundle.json"]);
    assert!(stdout.contains("Successfully imported 1 items! New items added to existing data."));

    let goals = run_json(tmp.path(), &["list", "goals", "--json"]);
    assert_eq!(goals[0]["status"], "not-started");
    assert_eq!(goals[0]["progress"], 0);
}

#[test]
fn test_clear_resets_everything() {
    let tmp = initialized();
    run_ok(tmp.path(), &["add", "note", "a", "--content", "b"]);
    run_ok(tmp.path(), &["budget", "--threshold", "50"]);
    run_ok(tmp.path(), &["language", "de"]);

    let output = run(tmp.path(), &["clear"]);
    assert!(!output.status.success());

    run_ok(tmp.path(), &["clear", "--force"]);
    let all = run_json(tmp.path(), &["list", "--json"]);
    assert_eq!(all["notes"], serde_json::json!([]));
    let budget = run_json(tmp.path(), &["budget", "--json"]);
    assert_eq!(budget["settings"]["warningThreshold"], 80);

    // preferences are not planner data
    let stdout = run_ok(tmp.path(), &["language"]);
    assert!(stdout.contains("Language: de"));
}

#[test]
fn test_pomodoro_counts_sessions() {
    let tmp = initialized();
    let stats = run_json(tmp.path(), &["pomodoro", "--json"]);
    assert_eq!(stats["count"], 0);

    for _ in 0..3 {
        run_ok(tmp.path(), &["pomodoro", "--complete"]);
    }
    let stdout = run_ok(tmp.path(), &["pomodoro", "--complete"]);
    assert!(stdout.contains("#4"));
    assert!(stdout.contains("long break (15 min)"));

    let stats = run_json(tmp.path(), &["pomodoro", "--json"]);
    assert_eq!(stats["count"], 4);
}

#[test]
fn test_language_rejects_unknown_code() {
    let tmp = initialized();
    let output = run(tmp.path(), &["language", "xx"]);
    assert!(!output.status.success());

    let stdout = run_ok(tmp.path(), &["language", "hu"]);
    assert!(stdout.contains("Magyar"));
}

#[test]
fn test_settings_export_import_reset() {
    let tmp = initialized();
    let settings = run_json(tmp.path(), &["settings", "show", "--json"]);
    assert_eq!(settings["general"]["timeZone"], "UTC");
    assert_eq!(settings["notifications"]["notificationTime"], "09:00");

    std::fs::write(
        tmp.path().join("settings.json"),
        r#"{"version":"1.0","settings":{"general":{"timeZone":"Europe/Budapest"},"privacy":{"analytics":true}}}"#,
    )
    .unwrap();
    run_ok(tmp.path(), &["settings", "import", "settings.json"]);

    let settings = run_json(tmp.path(), &["settings", "show", "--json"]);
    assert_eq!(settings["general"]["timeZone"], "Europe/Budapest");
    assert_eq!(settings["general"]["dateFormat"], "MM/DD/YYYY");
    assert_eq!(settings["privacy"]["analytics"], true);

    let exported = run_json(tmp.path(), &["settings", "export"]);
    assert_eq!(exported["version"], "1.0");
    assert_eq!(exported["settings"]["general"]["timeZone"], "Europe/Budapest");

    run_ok(tmp.path(), &["settings", "reset"]);
    let settings = run_json(tmp.path(), &["settings", "show", "--json"]);
    assert_eq!(settings["general"]["timeZone"], "UTC");
    assert_eq!(settings["privacy"]["analytics"], false);

    std::fs::write(tmp.path().join("junk.json"), "not json").unwrap();
    let output = run(tmp.path(), &["settings", "import", "junk.json"]);
    assert!(!output.status.success());
}

#[test]
fn test_commands_work_from_subdirectory() {
    let tmp = initialized();
    let nested = tmp.path().join("deep/inside");
    std::fs::create_dir_all(&nested).unwrap();

    run_ok(&nested, &["add", "note", "From below", "--content", "x"]);
    let notes = run_json(tmp.path(), &["list", "notes", "--json"]);
    assert_eq!(notes[0]["title"], "From below");
}

#[test]
fn test_update_note_and_drawing() {
    let tmp = initialized();
    let note = run_json(
        tmp.path(),
        &["add", "note", "Draft", "--content", "v1", "--tag", "old", "--json"],
    );
    let id = note["id"].as_str().unwrap();

    let note = run_json(
        tmp.path(),
        &["update", "note", id, "--content", "v2", "--tag", "a", "--tag", "b", "--json"],
    );
    assert_eq!(note["title"], "Draft");
    assert_eq!(note["content"], "v2");
    assert_eq!(note["tags"], serde_json::json!(["a", "b"]));

    let note = run_json(tmp.path(), &["update", "note", id, "--clear-tags", "--json"]);
    assert_eq!(note["tags"], serde_json::json!([]));
    assert_eq!(note["content"], "v2");

    let output = run(tmp.path(), &["update", "note", id, "--content", ""]);
    assert!(!output.status.success());

    let drawing = run_json(
        tmp.path(),
        &["add", "drawing", "Sketch", "--data", "data:image/png;base64,AAAA", "--json"],
    );
    let id = drawing["id"].as_str().unwrap();
    let drawing = run_json(
        tmp.path(),
        &["update", "drawing", id, "--title", "Final sketch", "--json"],
    );
    assert_eq!(drawing["title"], "Final sketch");
    assert_eq!(drawing["data"], "data:image/png;base64,AAAA");
}

#[test]
fn test_update_subscription_and_transaction() {
    let tmp = initialized();
    let sub = run_json(
        tmp.path(),
        &["add", "subscription", "Gym", "--cost", "30", "--next-payment", "2024-07-01", "--json"],
    );
    let sub_id = sub["id"].as_str().unwrap();

    let sub = run_json(
        tmp.path(),
        &["update", "subscription", sub_id, "--cost", "35", "--cycle", "yearly", "--pause", "--json"],
    );
    assert_eq!(sub["cost"], 35.0);
    assert_eq!(sub["billingCycle"], "yearly");
    assert_eq!(sub["isActive"], false);
    assert_eq!(sub["name"], "Gym");

    let tx = run_json(
        tmp.path(),
        &["add", "transaction", "Gym fee", "--amount", "35", "--date", "2024-06-03", "--json"],
    );
    let tx_id = tx["id"].as_str().unwrap();
    assert!(tx.get("subscriptionId").is_none());

    let tx = run_json(
        tmp.path(),
        &["update", "transaction", tx_id, "--subscription", sub_id, "--type", "subscription", "--json"],
    );
    assert_eq!(tx["subscriptionId"], sub_id);
    assert_eq!(tx["type"], "subscription");
    assert_eq!(tx["date"], "2024-06-03");

    let tx = run_json(tmp.path(), &["update", "transaction", tx_id, "--detach", "--json"]);
    assert!(tx.get("subscriptionId").is_none());
    assert_eq!(tx["amount"], 35.0);
}

#[test]
fn test_settings_set_changes_one_field() {
    let tmp = initialized();
    let stdout = run_ok(tmp.path(), &["settings", "set", "general.sidebarPosition", "right"]);
    assert!(stdout.contains("general.sidebarPosition"));
    run_ok(tmp.path(), &["settings", "set", "notifications.weeklySummary", "on"]);

    let settings = run_json(tmp.path(), &["settings", "show", "--json"]);
    assert_eq!(settings["general"]["sidebarPosition"], "right");
    assert_eq!(settings["general"]["timeZone"], "UTC");
    assert_eq!(settings["notifications"]["weeklySummary"], true);

    let output = run(tmp.path(), &["settings", "set", "general.sidebarPosition", "top"]);
    assert!(!output.status.success());
    let output = run(tmp.path(), &["settings", "set", "general.theme", "dark"]);
    assert!(!output.status.success());
}

#[test]
fn test_date_range_requires_plan_type() {
    let tmp = initialized();
    run_ok(tmp.path(), &["add", "note", "n", "--content", "x"]);

    let output = run(tmp.path(), &["list", "notes", "--from", "2024-06-01"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--from"));

    let output = run(tmp.path(), &["list", "--to", "2024-06-01"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--to"));

    run_ok(tmp.path(), &["list", "plans", "--from", "2024-06-01"]);
}
