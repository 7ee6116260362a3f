//! JSON bodies returned by the API routes.

use crate::models::{Category, Tool, ToolCategory};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/getEntries`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntriesBody {
    pub tools: Vec<Tool>,
    /// Total number of tools across all pages.
    pub count: u64,
}

/// Body of `GET /api/category/:id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    pub category_data: Option<Category>,
    pub category_results: Vec<ToolCategory>,
}
