use crate::config::Config;
use crate::diff;
use crate::github::{self, IssueSource};
use crate::notify::{self, DispatchReport, NotifyTarget, WebhookSender};
use crate::storage::SnapshotStorage;
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Summary of one notifier pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub changed: usize,
    pub dispatch: DispatchReport,
}

/// Runs fetch → diff → notify → persist once.
///
/// The new snapshot replaces the stored one after dispatch whatever the
/// delivery outcome, including when the fetch degraded to an empty snapshot.
/// Only a failure to save is returned as an error.
pub async fn run<S, W, P>(
    config: &Config,
    source: &S,
    sender: &W,
    storage: &P,
    today: NaiveDate,
) -> Result<RunReport>
where
    S: IssueSource,
    W: WebhookSender,
    P: SnapshotStorage,
{
    let old_state = storage.load();
    let new_state = github::fetch_snapshot(source, &config.project_key(), today).await;
    if new_state.is_empty() && !old_state.is_empty() {
        tracing::warn!(
            previous = old_state.len(),
            "Fetched no issues; the stored snapshot will be replaced with an empty one"
        );
    }

    let changes = diff::diff(&old_state, &new_state);
    tracing::info!(
        fetched = new_state.len(),
        changed = changes.len(),
        "Compared with previous snapshot"
    );

    let target = NotifyTarget {
        org: config.org.clone(),
        repo: config.repo.clone(),
        mention: config.notify_users.clone(),
    };
    let dispatch = notify::dispatch(&changes, &target, sender, config.notify_limit).await;

    storage
        .save(&new_state)
        .context("Failed to save snapshot")?;

    Ok(RunReport {
        fetched: new_state.len(),
        changed: changes.len(),
        dispatch,
    })
}
