use anyhow::{Context, Result};
use std::time::Duration;

/// GitHub API endpoints
pub mod endpoints {
    pub const GRAPHQL: &str = "https://api.github.com/graphql";
    pub const WEB: &str = "https://github.com";
}

const USER_AGENT: &str = "status-notify";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can answer a GraphQL search with a raw JSON body.
#[allow(async_fn_in_trait)]
pub trait IssueSource {
    async fn search(&self, query: &str) -> Result<serde_json::Value>;
}

/// Bearer-authenticated client for the GitHub GraphQL API.
pub struct GraphQlClient {
    client: reqwest::Client,
    token: String,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(token, endpoints::GRAPHQL)
    }

    pub fn with_endpoint(token: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(GraphQlClient {
            client,
            token: token.into(),
            endpoint: endpoint.into(),
        })
    }
}

impl IssueSource for GraphQlClient {
    async fn search(&self, query: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .context("GraphQL request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "GraphQL request error: HTTP {}",
                response.status()
            ));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .context("Failed to decode GraphQL response")?;
        Ok(body)
    }
}
