use crate::{FakeTracker, FakeWebhook, NotifierWorld};
use chrono::NaiveDate;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use serde_json::json;
use status_notify::config::Config;
use status_notify::snapshot::Snapshot;
use status_notify::status::Status;
use status_notify::storage::{FileSnapshotStorage, SnapshotStorage};
use std::cell::RefCell;

fn status_named(name: &str) -> Status {
    match name {
        "DevelopmentPendingFrontend" => Status::DevelopmentPendingFrontend,
        "QATesting" => Status::QaTesting,
        "Unset" => Status::Unset,
        other => panic!("Unknown bucket {other:?}"),
    }
}

fn parse_numbers(list: &str) -> Vec<u64> {
    list.split(',')
        .map(|n| n.trim().trim_start_matches('#'))
        .filter(|n| !n.is_empty())
        .map(|n| n.parse().unwrap_or_else(|e| panic!("Bad issue number {n:?}: {e}")))
        .collect()
}

fn stored_snapshot(world: &mut NotifierWorld) -> Snapshot {
    let path = world.state_path();
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read state file {:?}: {}", path, e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("State file is not a snapshot: {e}\n---\n{content}\n---"))
}

#[given("there is no state file")]
async fn given_no_state_file(world: &mut NotifierWorld) {
    let path = world.state_path();
    let _ = std::fs::remove_file(&path);
}

#[given("the state file contains:")]
async fn given_state_file_contains(world: &mut NotifierWorld, step: &Step) {
    let content = step
        .docstring
        .as_ref()
        .expect("Expected docstring with state file content");
    let path = world.state_path();
    if let Some(parent_dir) = path.parent() {
        std::fs::create_dir_all(parent_dir)
            .unwrap_or_else(|e| panic!("Failed to create state dir {:?}: {}", parent_dir, e));
    }
    std::fs::write(&path, content.trim())
        .unwrap_or_else(|e| panic!("Failed to write state file {:?}: {}", path, e));
}

#[given("the tracker returns the issues:")]
async fn given_tracker_returns(world: &mut NotifierWorld, step: &Step) {
    let table = step.table.as_ref().expect("Expected a table of issues");
    let nodes: Vec<serde_json::Value> = table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            let number: u64 = row[0].parse().expect("Issue number must be numeric");
            let field_values = if row[2].is_empty() {
                json!([])
            } else {
                json!([{ "field": { "name": "Status" }, "name": row[2] }])
            };
            json!({
                "__typename": "Issue",
                "id": format!("I_kw{number}"),
                "number": number,
                "title": row[1],
                "updatedAt": "2025-09-01T08:00:00Z",
                "projectItems": { "nodes": [ { "fieldValues": { "nodes": field_values } } ] }
            })
        })
        .collect();
    world.tracker_response = Some(json!({ "data": { "search": { "nodes": nodes } } }));
}

#[given("the tracker is unreachable")]
async fn given_tracker_unreachable(world: &mut NotifierWorld) {
    world.tracker_response = None;
}

#[given(regex = r#"^the tracker answers with the error "(.*)"$"#)]
async fn given_tracker_error(world: &mut NotifierWorld, message: String) {
    world.tracker_response = Some(json!({ "errors": [{ "message": message }] }));
}

#[given(regex = r"^the webhook fails the first (\d+) messages?$")]
async fn given_webhook_fails(world: &mut NotifierWorld, failures: usize) {
    world.webhook_failures = failures;
}

#[given(regex = r"^the notification limit is (\d+)$")]
async fn given_notification_limit(world: &mut NotifierWorld, limit: usize) {
    world.notify_limit = Some(limit);
}

#[when("the notifier runs")]
async fn when_notifier_runs(world: &mut NotifierWorld) {
    let state_path = world.state_path();
    let limit = world.notify_limit.map(|l| l.to_string());
    let config = Config::from_lookup(|key| match key {
        "GITHUB_TOKEN" => Some("ghp_test".to_string()),
        "ORG" => Some("acme".to_string()),
        "PROJECT_NUM" => Some("4".to_string()),
        "REPO" => Some("storefront".to_string()),
        "NOTIFY_USERS" => Some("@front-team".to_string()),
        "STATE_FILE" => Some(state_path.display().to_string()),
        "NOTIFY_LIMIT" => limit.clone(),
        _ => None,
    })
    .expect("Test configuration should be valid");

    let tracker = FakeTracker {
        response: world.tracker_response.clone(),
    };
    let webhook = FakeWebhook {
        failures: world.webhook_failures,
        attempts: RefCell::new(0),
        delivered: RefCell::new(Vec::new()),
    };
    let storage = FileSnapshotStorage::new(config.state_file.clone());
    let today = NaiveDate::from_ymd_opt(2025, 10, 19).expect("Valid date");

    let result = status_notify::run::run(&config, &tracker, &webhook, &storage, today).await;

    world.send_attempts = *webhook.attempts.borrow();
    world.delivered = webhook.delivered.into_inner();
    world.run_result = Some(result.map_err(|e| format!("{e:#}")));
}

#[then("the run should succeed")]
async fn then_run_succeeds(world: &mut NotifierWorld) {
    match &world.run_result {
        Some(Ok(_)) => {}
        other => panic!("Expected a successful run, got {other:?}"),
    }
}

#[then(regex = r"^(\d+) notifications? should be delivered$")]
async fn then_notifications_delivered(world: &mut NotifierWorld, count: usize) {
    assert_eq!(
        world.delivered.len(),
        count,
        "Delivered payloads: {:#?}",
        world.delivered
    );
}

#[then(regex = r"^(\d+) webhook calls? should have been made$")]
async fn then_webhook_calls(world: &mut NotifierWorld, count: usize) {
    assert_eq!(world.send_attempts, count);
}

#[then(regex = r#"^notification (\d+) should link issue #(\d+) with icon "(.*)"$"#)]
async fn then_notification_links(
    world: &mut NotifierWorld,
    index: usize,
    number: u64,
    icon: String,
) {
    let payload = world
        .delivered
        .get(index - 1)
        .unwrap_or_else(|| panic!("No notification #{index}: {:#?}", world.delivered));
    let url = format!("https://github.com/acme/storefront/issues/{number}");
    assert!(
        payload.text.contains(&url),
        "Expected '{}' in notification text:\n{}",
        url,
        payload.text
    );
    assert!(payload.text.contains("@front-team"));
    assert_eq!(payload.icon_emoji, icon);
}

#[then(regex = r#"^the state file should list (.*) under "(\w+)"$"#)]
async fn then_state_file_lists(world: &mut NotifierWorld, list: String, bucket: String) {
    let snapshot = stored_snapshot(world);
    let numbers: Vec<u64> = snapshot
        .bucket(status_named(&bucket))
        .iter()
        .map(|r| r.number)
        .collect();
    let expected = if list == "nothing" {
        Vec::new()
    } else {
        parse_numbers(&list)
    };
    assert_eq!(numbers, expected, "Bucket {bucket} in {snapshot:#?}");
}

#[then("the state file should be empty")]
async fn then_state_file_empty(world: &mut NotifierWorld) {
    let snapshot = stored_snapshot(world);
    assert!(snapshot.is_empty(), "Expected empty snapshot, got {snapshot:#?}");
}

#[then("loading the state file again should give the same snapshot")]
async fn then_reload_is_stable(world: &mut NotifierWorld) {
    let path = world.state_path();
    let storage = FileSnapshotStorage::new(&path);
    let first = storage.load();
    storage.save(&first).expect("Re-saving the snapshot should succeed");
    let before = std::fs::read_to_string(&path).expect("State file should exist");
    storage.save(&storage.load()).expect("Re-saving the snapshot should succeed");
    let after = std::fs::read_to_string(&path).expect("State file should exist");

    assert_eq!(storage.load(), first);
    assert_eq!(before, after);
}
