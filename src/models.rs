//! Rows served by the directory API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category as attached to a tool row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub category_name: String,
    pub category_icon: Option<String>,
}

/// A directory entry with the categories it is tagged with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub github_url: Option<String>,
    pub submitted_by: Option<String>,
    pub upvotes: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<CategorySummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
    pub category_icon: Option<String>,
    pub category_description: Option<String>,
}

impl Category {
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            category_name: self.category_name.clone(),
            category_icon: self.category_icon.clone(),
        }
    }
}

/// One row of the tool/category join with the tool embedded under `tools`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCategory {
    pub tool_id: i64,
    pub category_id: i64,
    pub tools: Tool,
}

/// Result of a vote or unvote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub tool_id: i64,
    pub upvotes: i32,
    /// Whether the user has a vote on the tool after the action.
    pub voted: bool,
    /// False when the action repeated the current state.
    pub changed: bool,
}

/// Authenticated user casting votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Voter(pub Uuid);
