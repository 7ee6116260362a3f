//! ToolStore over a PostgreSQL pool.

use super::ToolStore;
use crate::error::AppError;
use crate::models::{Category, CategorySummary, Tool, ToolCategory, VoteOutcome, Voter};
use crate::pagination::Page;
use crate::search::SearchTerm;
use crate::sql::{self, bind_all, QueryBuf};
use crate::view::EntriesView;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

#[derive(Clone)]
pub struct PgToolStore {
    pool: PgPool,
    schema: String,
}

impl PgToolStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgToolStore {
            pool,
            schema: schema.into(),
        }
    }

    async fn fetch_tools(&self, q: &QueryBuf) -> Result<Vec<Tool>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| tool_from_row(r).map_err(AppError::from)).collect()
    }

    /// Lock the tool row and return its vote count; unknown tools are NotFound.
    async fn locked_upvotes(&self, conn: &mut PgConnection, tool_id: i64) -> Result<i32, AppError> {
        let q = sql::lock_upvotes(&self.schema, tool_id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("tool {}", tool_id)))?;
        Ok(row.try_get("upvotes")?)
    }

    async fn adjust(&self, conn: &mut PgConnection, tool_id: i64, delta: i32) -> Result<i32, AppError> {
        let q = sql::adjust_upvotes(&self.schema, tool_id, delta);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row.try_get("upvotes")?)
    }
}

#[async_trait]
impl ToolStore for PgToolStore {
    async fn search(&self, term: &SearchTerm, page: Page) -> Result<Vec<Tool>, AppError> {
        self.fetch_tools(&sql::search_tools(&self.schema, term, page)).await
    }

    async fn entries(&self, view: EntriesView, page: Page) -> Result<Vec<Tool>, AppError> {
        self.fetch_tools(&sql::select_entries(&self.schema, view, page)).await
    }

    async fn count(&self) -> Result<u64, AppError> {
        let q = sql::count_tools(&self.schema);
        let row = sqlx::query(&q.sql).fetch_one(&self.pool).await?;
        let n: i64 = row.try_get(0)?;
        Ok(n.max(0) as u64)
    }

    async fn category(&self, id: i64) -> Result<Option<Category>, AppError> {
        let q = sql::select_category(&self.schema, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| -> Result<Category, sqlx::Error> {
            Ok(Category {
                id: r.try_get("id")?,
                category_name: r.try_get("category_name")?,
                category_icon: r.try_get("category_icon")?,
                category_description: r.try_get("category_description")?,
            })
        })
        .transpose()
        .map_err(AppError::from)
    }

    async fn category_results(&self, id: i64) -> Result<Vec<ToolCategory>, AppError> {
        let q = sql::select_category_results(&self.schema, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| -> Result<ToolCategory, sqlx::Error> {
                Ok(ToolCategory {
                    tool_id: r.try_get("tool_id")?,
                    category_id: r.try_get("category_id")?,
                    tools: tool_from_row(r)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }

    async fn vote(&self, voter: Voter, tool_id: i64) -> Result<VoteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = self.locked_upvotes(&mut *tx, tool_id).await?;
        let q = sql::insert_vote(&self.schema, voter.0, tool_id);
        let inserted = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            == 1;
        let upvotes = if inserted {
            self.adjust(&mut *tx, tool_id, 1).await?
        } else {
            current
        };
        tx.commit().await?;
        tracing::info!(tool_id, user = %voter.0, upvotes, changed = inserted, "vote");
        Ok(VoteOutcome {
            tool_id,
            upvotes,
            voted: true,
            changed: inserted,
        })
    }

    async fn unvote(&self, voter: Voter, tool_id: i64) -> Result<VoteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = self.locked_upvotes(&mut *tx, tool_id).await?;
        let q = sql::delete_vote(&self.schema, voter.0, tool_id);
        let deleted = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            == 1;
        let upvotes = if deleted {
            self.adjust(&mut *tx, tool_id, -1).await?
        } else {
            current
        };
        tx.commit().await?;
        tracing::info!(tool_id, user = %voter.0, upvotes, changed = deleted, "unvote");
        Ok(VoteOutcome {
            tool_id,
            upvotes,
            voted: false,
            changed: deleted,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn tool_from_row(row: &PgRow) -> Result<Tool, sqlx::Error> {
    let categories: sqlx::types::Json<Vec<CategorySummary>> = row.try_get("categories")?;
    Ok(Tool {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        website_url: row.try_get("website_url")?,
        github_url: row.try_get("github_url")?,
        submitted_by: row.try_get("submitted_by")?,
        upvotes: row.try_get("upvotes")?,
        created_at: row.try_get("created_at")?,
        categories: categories.0,
    })
}
