use crate::snapshot::IssueRecord;
use crate::status::{STATUS_FIELD_NAME, Status};
use serde::Deserialize;

/// GraphQL `{ nodes: [...] }` connection wrapper.
#[derive(Deserialize, Debug)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Connection { nodes: Vec::new() }
    }
}

/// Body of a GraphQL search response. Either `data` or `errors` is set.
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    pub data: Option<SearchData>,
    pub errors: Option<serde_json::Value>,
}

/// Search results. Nodes the token cannot see come back as `null`.
#[derive(Deserialize, Debug)]
pub struct SearchData {
    pub search: Connection<Option<SearchNode>>,
}

/// A search result node. Only issues are classified.
#[derive(Deserialize, Debug)]
#[serde(tag = "__typename")]
pub enum SearchNode {
    Issue(IssueNode),
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    pub number: u64,
    pub title: String,
    pub updated_at: String,
    #[serde(default)]
    pub project_items: Connection<ProjectItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    #[serde(default)]
    pub field_values: Connection<FieldValue>,
}

/// A project field value. Values of non single-select fields arrive as `{}`.
#[derive(Deserialize, Debug, Default)]
pub struct FieldValue {
    #[serde(default)]
    pub field: Option<FieldRef>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct FieldRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl IssueNode {
    /// Status from the first project item's "Status" field, `Unset` if absent.
    pub fn status(&self) -> Status {
        self.project_items
            .nodes
            .first()
            .and_then(|item| {
                item.field_values.nodes.iter().find(|value| {
                    value.field.as_ref().and_then(|f| f.name.as_deref()) == Some(STATUS_FIELD_NAME)
                })
            })
            .and_then(|value| value.name.as_deref())
            .map_or(Status::Unset, Status::from_field_value)
    }

    pub fn to_record(&self) -> IssueRecord {
        IssueRecord {
            title: self.title.clone(),
            number: self.number,
            updated_at: self.updated_at.clone(),
        }
    }
}
