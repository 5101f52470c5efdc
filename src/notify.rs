use crate::diff::ChangeSet;
use crate::github::client::endpoints;
use crate::status::Status;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

/// JSON body posted to the Slack incoming webhook.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub text: String,
    pub icon_emoji: String,
}

/// Where notifications point and whom they mention.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyTarget {
    pub org: String,
    pub repo: String,
    pub mention: String,
}

impl NotifyTarget {
    pub fn issue_url(&self, number: u64) -> String {
        issue_url(&self.org, &self.repo, number)
    }
}

pub fn issue_url(org: &str, repo: &str, number: u64) -> String {
    format!("{}/{org}/{repo}/issues/{number}", endpoints::WEB)
}

/// Builds the message announcing that an issue entered `status`.
///
/// Returns `None` for `Status::Unset`, which is never announced.
pub fn build_message(status: Status, mention: &str, title: &str, url: &str) -> Option<WebhookPayload> {
    let (headline, icon) = match status {
        Status::DevelopmentPendingFrontend => (
            format!("Issue status changed to *開発待ち(Frontend)* : {mention} 次のフロント開発準備OK👍 "),
            ":rocket:",
        ),
        Status::QaTesting => (
            format!("Issue status changed to *テスト中* : {mention} テストを開始してください🏃‍♂️ "),
            ":test_tube:",
        ),
        Status::Unset => return None,
    };
    Some(WebhookPayload {
        text: format!("{headline}\n*Issue Title:* <{url}|{title}>"),
        icon_emoji: icon.to_string(),
    })
}

/// Delivers a payload to the messaging webhook.
#[allow(async_fn_in_trait)]
pub trait WebhookSender {
    async fn send(&self, payload: &WebhookPayload) -> Result<()>;
}

/// Slack incoming-webhook sender.
pub struct SlackWebhook {
    client: reqwest::Client,
    url: Option<String>,
}

impl SlackWebhook {
    pub fn new(url: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(SlackWebhook { client, url })
    }
}

impl WebhookSender for SlackWebhook {
    async fn send(&self, payload: &WebhookPayload) -> Result<()> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SLACK_WEBHOOK_URL is not set"))?;

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .context("Webhook request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Webhook request error: HTTP {}",
                response.status()
            ));
        }
        Ok(())
    }
}

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    /// Changes left unsent because the limit was reached.
    pub skipped: usize,
    pub capped: bool,
}

/// Sends one message per change, in bucket order, until `limit` messages
/// have been delivered for the whole run.
///
/// Each send is awaited before the limit is checked. Failed sends are logged
/// and do not count toward the limit.
pub async fn dispatch<W: WebhookSender>(
    changes: &ChangeSet,
    target: &NotifyTarget,
    sender: &W,
    limit: usize,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (index, (status, record)) in changes.iter().enumerate() {
        if report.sent >= limit {
            report.capped = true;
            report.skipped = changes.len() - index;
            tracing::info!(
                limit,
                skipped = report.skipped,
                "Notification limit reached, skipping remaining changes"
            );
            break;
        }

        let url = target.issue_url(record.number);
        let Some(payload) = build_message(status, &target.mention, &record.title, &url) else {
            continue;
        };

        match sender.send(&payload).await {
            Ok(()) => {
                report.sent += 1;
                tracing::info!(number = record.number, status = status.key(), "Notification sent");
            }
            Err(e) => {
                report.failed += 1;
                tracing::error!(
                    number = record.number,
                    status = status.key(),
                    "Failed to send notification: {e:#}"
                );
            }
        }
    }

    report
}
