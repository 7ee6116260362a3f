//! The two sort orders of the entries table.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntriesView {
    /// Most votes first.
    #[default]
    #[serde(rename = "standard")]
    Standard,
    /// Newest first.
    #[serde(rename = "recentlyAdded")]
    RecentlyAdded,
}

impl EntriesView {
    pub fn as_str(self) -> &'static str {
        match self {
            EntriesView::Standard => "standard",
            EntriesView::RecentlyAdded => "recentlyAdded",
        }
    }

    /// Resolve the optional `get` query value; absent means the standard view.
    pub fn from_query(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(EntriesView::Standard),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for EntriesView {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(EntriesView::Standard),
            "recentlyAdded" => Ok(EntriesView::RecentlyAdded),
            _ => Err(AppError::BadRequest(format!(
                "invalid view: {} (expected standard or recentlyAdded)",
                s
            ))),
        }
    }
}

impl fmt::Display for EntriesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
