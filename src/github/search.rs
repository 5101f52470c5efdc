use crate::github::client::IssueSource;
use crate::github::issues::{SearchNode, SearchResponse};
use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Months, NaiveDate};

/// How far back the search looks for updated issues.
const LOOKBACK_MONTHS: u32 = 6;

/// Lower bound for the `updated:` search qualifier.
///
/// Subtracts calendar months, clamping to the last day of a shorter month.
pub fn cutoff_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Builds the GraphQL search for open issues of `project_key` updated on or
/// after `cutoff`.
pub fn build_search_query(project_key: &str, cutoff: NaiveDate) -> String {
    format!(
        r#"query {{
  search(query: "is:open is:issue project:{project_key} updated:>={cutoff}", type: ISSUE, first: 100) {{
    nodes {{
      __typename
      ... on Issue {{
        id
        number
        title
        updatedAt
        projectItems(first: 10) {{
          nodes {{
            fieldValues(first: 10) {{
              nodes {{
                ... on ProjectV2ItemFieldSingleSelectValue {{
                  field {{
                    ... on ProjectV2SingleSelectField {{
                      name
                    }}
                  }}
                  name
                }}
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        cutoff = cutoff.format("%Y-%m-%d"),
    )
}

/// Renders an RFC 3339 stamp in local time, or as-is if it does not parse.
fn local_time(updated_at: &str) -> String {
    DateTime::parse_from_rfc3339(updated_at)
        .map(|t| t.with_timezone(&Local).format("%Y/%m/%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| updated_at.to_string())
}

/// Classifies every issue of a search response into status buckets.
///
/// Returns an `Err` if the response carries GraphQL `errors` or has no data.
pub fn classify_search_response(body: serde_json::Value) -> Result<Snapshot> {
    let response: SearchResponse =
        serde_json::from_value(body).context("Unexpected GraphQL response shape")?;

    if let Some(errors) = response.errors {
        return Err(anyhow::anyhow!("GraphQL errors: {errors}"));
    }
    let data = response
        .data
        .ok_or_else(|| anyhow::anyhow!("GraphQL response has no data"))?;

    let mut snapshot = Snapshot::default();
    for node in &data.search.nodes {
        let Some(SearchNode::Issue(issue)) = node else {
            continue;
        };
        let status = issue.status();
        if !snapshot.insert(status, issue.to_record()) {
            tracing::warn!(number = issue.number, "Duplicate issue in search results");
            continue;
        }
        tracing::info!(
            "Title: {}, Status: {}, Number: {}, Updated At: {}",
            issue.title,
            status.label(),
            issue.number,
            local_time(&issue.updated_at)
        );
    }
    Ok(snapshot)
}

/// Fetches and classifies the current issues.
///
/// Any transport or API failure is logged and yields an empty snapshot.
pub async fn fetch_snapshot<S: IssueSource>(
    source: &S,
    project_key: &str,
    today: NaiveDate,
) -> Snapshot {
    let query = build_search_query(project_key, cutoff_date(today));
    tracing::debug!(%query, "Searching issues");

    match source
        .search(&query)
        .await
        .and_then(classify_search_response)
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Failed to fetch issues: {e:#}");
            Snapshot::default()
        }
    }
}
