use cucumber::World;
use status_notify::notify::{WebhookPayload, WebhookSender};
use status_notify::run::RunReport;
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Debug, Default, World)]
pub struct NotifierWorld {
    pub state_dir: Option<tempfile::TempDir>,
    pub tracker_response: Option<serde_json::Value>,
    pub webhook_failures: usize,
    pub notify_limit: Option<usize>,
    pub delivered: Vec<WebhookPayload>,
    pub send_attempts: usize,
    pub run_result: Option<Result<RunReport, String>>,
}

impl NotifierWorld {
    pub fn state_path(&mut self) -> PathBuf {
        self.state_dir
            .get_or_insert_with(|| tempfile::tempdir().expect("Failed to create temp dir"))
            .path()
            .join("data")
            .join("state.json")
    }
}

/// Webhook fake that fails its first `failures` sends.
pub struct FakeWebhook {
    pub failures: usize,
    pub attempts: RefCell<usize>,
    pub delivered: RefCell<Vec<WebhookPayload>>,
}

impl WebhookSender for FakeWebhook {
    async fn send(&self, payload: &WebhookPayload) -> anyhow::Result<()> {
        let attempt = {
            let mut attempts = self.attempts.borrow_mut();
            *attempts += 1;
            *attempts
        };
        if attempt <= self.failures {
            return Err(anyhow::anyhow!("HTTP 500 Internal Server Error"));
        }
        self.delivered.borrow_mut().push(payload.clone());
        Ok(())
    }
}

/// Tracker fake answering every search with a fixed body, or failing.
pub struct FakeTracker {
    pub response: Option<serde_json::Value>,
}

impl status_notify::github::IssueSource for FakeTracker {
    async fn search(&self, _query: &str) -> anyhow::Result<serde_json::Value> {
        self.response
            .clone()
            .ok_or_else(|| anyhow::anyhow!("error sending request: connection refused"))
    }
}

#[tokio::main]
async fn main() {
    NotifierWorld::run("features").await;
}

mod steps;
