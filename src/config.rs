use crate::storage::DEFAULT_STATE_FILE;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    GithubToken,
    Org,
    ProjectNumber,
    Repo,
    SlackWebhookUrl,
    NotifyUsers,
    StateFile,
    NotifyLimit,
}

impl ConfigKey {
    /// Environment variable holding this setting.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::GithubToken => "GITHUB_TOKEN",
            ConfigKey::Org => "ORG",
            ConfigKey::ProjectNumber => "PROJECT_NUM",
            ConfigKey::Repo => "REPO",
            ConfigKey::SlackWebhookUrl => "SLACK_WEBHOOK_URL",
            ConfigKey::NotifyUsers => "NOTIFY_USERS",
            ConfigKey::StateFile => "STATE_FILE",
            ConfigKey::NotifyLimit => "NOTIFY_LIMIT",
        }
    }
}

/// Successful notifications allowed per run unless `NOTIFY_LIMIT` says otherwise.
pub const DEFAULT_NOTIFY_LIMIT: usize = 1;

/// Settings for one notifier run.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub github_token: String,
    pub org: String,
    pub project_number: String,
    pub repo: String,
    pub slack_webhook_url: Option<String>,
    pub notify_users: String,
    pub state_file: PathBuf,
    pub notify_limit: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("org", &self.org)
            .field("project_number", &self.project_number)
            .field("repo", &self.repo)
            .field(
                "slack_webhook_url",
                &self.slack_webhook_url.as_ref().map(|_| "<redacted>"),
            )
            .field("notify_users", &self.notify_users)
            .field("state_file", &self.state_file)
            .field("notify_limit", &self.notify_limit)
            .finish()
    }
}

impl Config {
    /// Builds the configuration from a key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    ///
    /// - Returns an `Err` if `GITHUB_TOKEN` is missing.
    /// - Returns an `Err` if `NOTIFY_LIMIT` is not a non-negative integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: ConfigKey| lookup(key.as_str()).filter(|v| !v.trim().is_empty());

        let github_token = get(ConfigKey::GithubToken).ok_or_else(|| {
            anyhow::anyhow!(
                "{} is not set. Please set it in the environment variables.",
                ConfigKey::GithubToken.as_str()
            )
        })?;

        let notify_limit = match get(ConfigKey::NotifyLimit) {
            Some(raw) => raw.trim().parse::<usize>().with_context(|| {
                format!(
                    "{} must be a non-negative integer, got {raw:?}",
                    ConfigKey::NotifyLimit.as_str()
                )
            })?,
            None => DEFAULT_NOTIFY_LIMIT,
        };

        Ok(Config {
            github_token,
            org: get(ConfigKey::Org).unwrap_or_default(),
            project_number: get(ConfigKey::ProjectNumber).unwrap_or_default(),
            repo: get(ConfigKey::Repo).unwrap_or_default(),
            slack_webhook_url: get(ConfigKey::SlackWebhookUrl),
            notify_users: get(ConfigKey::NotifyUsers).unwrap_or_default(),
            state_file: get(ConfigKey::StateFile)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            notify_limit,
        })
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `<org>/<project number>` as used by the issue search qualifier.
    pub fn project_key(&self) -> String {
        format!("{}/{}", self.org, self.project_number)
    }
}
