//! Storage behind the API routes: a trait with a PostgreSQL and an in-memory implementation.

mod memory;
mod postgres;
mod schema;

pub use memory::{MemoryStore, NewTool};
pub use postgres::PgToolStore;
pub use schema::{ensure_database_exists, ensure_schema};

use crate::error::AppError;
use crate::models::{Category, Tool, ToolCategory, VoteOutcome, Voter};
use crate::pagination::Page;
use crate::search::SearchTerm;
use crate::view::EntriesView;
use async_trait::async_trait;

#[async_trait]
pub trait ToolStore: Send + Sync {
    /// One page of tools matching the term, most votes first.
    async fn search(&self, term: &SearchTerm, page: Page) -> Result<Vec<Tool>, AppError>;

    /// One page of tools in the given view.
    async fn entries(&self, view: EntriesView, page: Page) -> Result<Vec<Tool>, AppError>;

    /// Total number of tools.
    async fn count(&self) -> Result<u64, AppError>;

    async fn category(&self, id: i64) -> Result<Option<Category>, AppError>;

    /// Join rows of a category ordered by tool id.
    async fn category_results(&self, id: i64) -> Result<Vec<ToolCategory>, AppError>;

    /// Record the voter's vote on a tool; repeating it changes nothing.
    async fn vote(&self, voter: Voter, tool_id: i64) -> Result<VoteOutcome, AppError>;

    /// Withdraw the voter's vote on a tool; repeating it changes nothing.
    async fn unvote(&self, voter: Voter, tool_id: i64) -> Result<VoteOutcome, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
