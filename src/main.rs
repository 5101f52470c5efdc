use anyhow::Context;
use status_notify::config::Config;
use status_notify::github::GraphQlClient;
use status_notify::notify::SlackWebhook;
use status_notify::storage::FileSnapshotStorage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let source = GraphQlClient::new(config.github_token.clone())?;
    let sender = SlackWebhook::new(config.slack_webhook_url.clone())?;
    let storage = FileSnapshotStorage::new(config.state_file.clone());
    let today = chrono::Local::now().date_naive();

    let report = status_notify::run::run(&config, &source, &sender, &storage, today)
        .await
        .context("Notifier run failed")?;

    tracing::info!(
        fetched = report.fetched,
        changed = report.changed,
        sent = report.dispatch.sent,
        failed = report.dispatch.failed,
        skipped = report.dispatch.skipped,
        "Run complete"
    );
    Ok(())
}
