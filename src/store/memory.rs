//! In-process ToolStore with the same ordering and matching rules as the SQL queries.
//! Backs the test suite and local demos without a database.

use super::ToolStore;
use crate::error::AppError;
use crate::models::{Category, CategorySummary, Tool, ToolCategory, VoteOutcome, Voter};
use crate::pagination::Page;
use crate::search::SearchTerm;
use crate::view::EntriesView;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Fields of a tool inserted by [`MemoryStore::add_tool`].
#[derive(Clone, Debug, Default)]
pub struct NewTool {
    pub name: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub github_url: Option<String>,
    pub submitted_by: Option<String>,
    pub upvotes: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTool {
    pub fn named(name: impl Into<String>) -> Self {
        NewTool {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct Inner {
    tools: BTreeMap<i64, Tool>,
    categories: BTreeMap<i64, Category>,
    links: BTreeSet<(i64, i64)>,
    votes: HashSet<(Uuid, i64)>,
    next_tool_id: i64,
    next_category_id: i64,
}

impl Inner {
    fn with_categories(&self, tool: &Tool) -> Tool {
        let mut categories: Vec<CategorySummary> = self
            .links
            .iter()
            .filter(|(t, _)| *t == tool.id)
            .filter_map(|(_, c)| self.categories.get(c).map(Category::summary))
            .collect();
        categories.sort_by(|a, b| a.category_name.cmp(&b.category_name));
        Tool {
            categories,
            ..tool.clone()
        }
    }

    fn ordered(&self, view: EntriesView) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        match view {
            EntriesView::Standard => tools.sort_by(|a, b| b.upvotes.cmp(&a.upvotes).then(a.id.cmp(&b.id))),
            EntriesView::RecentlyAdded => {
                tools.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
        }
        tools
    }

    fn page_of<'a>(&self, tools: impl Iterator<Item = &'a Tool>, page: Page) -> Vec<Tool> {
        tools
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|t| self.with_categories(t))
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a tool; ids are assigned sequentially from 1.
    pub fn add_tool(&self, new: NewTool) -> Tool {
        let mut inner = self.write();
        inner.next_tool_id += 1;
        let tool = Tool {
            id: inner.next_tool_id,
            name: new.name,
            description: new.description,
            website_url: new.website_url,
            github_url: new.github_url,
            submitted_by: new.submitted_by,
            upvotes: new.upvotes.max(0),
            created_at: new.created_at.unwrap_or_else(Utc::now),
            categories: Vec::new(),
        };
        inner.tools.insert(tool.id, tool.clone());
        tool
    }

    pub fn add_category(&self, name: &str, icon: Option<&str>, description: Option<&str>) -> Category {
        let mut inner = self.write();
        inner.next_category_id += 1;
        let category = Category {
            id: inner.next_category_id,
            category_name: name.to_string(),
            category_icon: icon.map(str::to_string),
            category_description: description.map(str::to_string),
        };
        inner.categories.insert(category.id, category.clone());
        category
    }

    /// Tag a tool with a category. Unknown ids are ignored, like a foreign key would reject them.
    pub fn tag(&self, tool_id: i64, category_id: i64) {
        let mut inner = self.write();
        if inner.tools.contains_key(&tool_id) && inner.categories.contains_key(&category_id) {
            inner.links.insert((tool_id, category_id));
        }
    }

    fn set_vote(&self, voter: Voter, tool_id: i64, voted: bool) -> Result<VoteOutcome, AppError> {
        let mut inner = self.write();
        if !inner.tools.contains_key(&tool_id) {
            return Err(AppError::NotFound(format!("tool {}", tool_id)));
        }
        let changed = if voted {
            inner.votes.insert((voter.0, tool_id))
        } else {
            inner.votes.remove(&(voter.0, tool_id))
        };
        let tool = inner
            .tools
            .get_mut(&tool_id)
            .ok_or_else(|| AppError::NotFound(format!("tool {}", tool_id)))?;
        if changed {
            let delta = if voted { 1 } else { -1 };
            tool.upvotes = (tool.upvotes + delta).max(0);
        }
        Ok(VoteOutcome {
            tool_id,
            upvotes: tool.upvotes,
            voted,
            changed,
        })
    }
}

#[async_trait]
impl ToolStore for MemoryStore {
    async fn search(&self, term: &SearchTerm, page: Page) -> Result<Vec<Tool>, AppError> {
        let inner = self.read();
        let matching = inner
            .ordered(EntriesView::Standard)
            .into_iter()
            .filter(|t| term.matches(&t.name) || t.description.as_deref().is_some_and(|d| term.matches(d)));
        Ok(inner.page_of(matching, page))
    }

    async fn entries(&self, view: EntriesView, page: Page) -> Result<Vec<Tool>, AppError> {
        let inner = self.read();
        Ok(inner.page_of(inner.ordered(view).into_iter(), page))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.read().tools.len() as u64)
    }

    async fn category(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.read().categories.get(&id).cloned())
    }

    async fn category_results(&self, id: i64) -> Result<Vec<ToolCategory>, AppError> {
        let inner = self.read();
        Ok(inner
            .links
            .iter()
            .filter(|(_, c)| *c == id)
            .filter_map(|(t, c)| {
                inner.tools.get(t).map(|tool| ToolCategory {
                    tool_id: *t,
                    category_id: *c,
                    tools: inner.with_categories(tool),
                })
            })
            .collect())
    }

    async fn vote(&self, voter: Voter, tool_id: i64) -> Result<VoteOutcome, AppError> {
        self.set_vote(voter, tool_id, true)
    }

    async fn unvote(&self, voter: Voter, tool_id: i64) -> Result<VoteOutcome, AppError> {
        self.set_vote(voter, tool_id, false)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap())
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_tool(NewTool { upvotes: 5, created_at: at(1), description: Some("container runtime".into()), ..NewTool::named("Docker") });
        store.add_tool(NewTool { upvotes: 9, created_at: at(3), ..NewTool::named("ripgrep") });
        store.add_tool(NewTool { upvotes: 5, created_at: at(2), ..NewTool::named("Podman") });
        store
    }

    #[tokio::test]
    async fn standard_view_orders_by_votes_then_id() {
        let store = seeded();
        let names: Vec<_> = store
            .entries(EntriesView::Standard, Page::FIRST)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["ripgrep", "Docker", "Podman"]);
    }

    #[tokio::test]
    async fn recently_added_view_orders_by_creation() {
        let store = seeded();
        let names: Vec<_> = store
            .entries(EntriesView::RecentlyAdded, Page::FIRST)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["ripgrep", "Podman", "Docker"]);
    }

    #[tokio::test]
    async fn pages_hold_ten_rows() {
        let store = MemoryStore::new();
        for i in 0..23 {
            store.add_tool(NewTool::named(format!("tool-{i:02}")));
        }
        assert_eq!(store.entries(EntriesView::Standard, Page::new(1)).await.unwrap().len(), 10);
        assert_eq!(store.entries(EntriesView::Standard, Page::new(3)).await.unwrap().len(), 3);
        assert!(store.entries(EntriesView::Standard, Page::new(4)).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 23);
    }

    #[tokio::test]
    async fn search_matches_name_and_description() {
        let store = seeded();
        let hits = store.search(&SearchTerm::parse("CONTAINER"), Page::FIRST).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Docker");

        let hits = store.search(&SearchTerm::parse("grep"), Page::FIRST).await.unwrap();
        assert_eq!(hits[0].name, "ripgrep");
    }

    #[tokio::test]
    async fn categories_attach_sorted_by_name() {
        let store = seeded();
        let cli = store.add_category("CLI", Some("terminal"), None);
        let search = store.add_category("Applications", None, None);
        store.tag(2, cli.id);
        store.tag(2, search.id);
        store.tag(99, cli.id);

        let results = store.category_results(cli.id).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tool_id, 2);
        let names: Vec<_> = results[0].tools.categories.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, ["Applications", "CLI"]);
    }

    #[tokio::test]
    async fn votes_are_idempotent_and_floor_at_zero() {
        let store = seeded();
        let voter = Voter(Uuid::new_v4());

        let first = store.vote(voter, 1).await.unwrap();
        assert!(first.changed);
        assert_eq!(first.upvotes, 6);
        let again = store.vote(voter, 1).await.unwrap();
        assert!(!again.changed);
        assert_eq!(again.upvotes, 6);

        let removed = store.unvote(voter, 1).await.unwrap();
        assert!(removed.changed && !removed.voted);
        assert_eq!(removed.upvotes, 5);
        let removed_again = store.unvote(voter, 1).await.unwrap();
        assert!(!removed_again.changed);
        assert_eq!(removed_again.upvotes, 5);

        assert!(matches!(store.vote(voter, 42).await, Err(AppError::NotFound(_))));
    }
}
