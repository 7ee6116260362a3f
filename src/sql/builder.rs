//! Builds the parameterized statements behind each API route.
//! Identifiers come from settings and are quoted; values are always bound.

use super::params::BindValue;
use crate::pagination::Page;
use crate::search::SearchTerm;
use crate::view::EntriesView;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<BindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }
}

/// Tool columns of alias `t`, plus its categories aggregated into a JSON array.
fn tool_columns(schema: &str) -> String {
    let join = qualified_table(schema, "tool_categories");
    let categories = qualified_table(schema, "categories");
    format!(
        "t.id, t.name, t.description, t.website_url, t.github_url, t.submitted_by, t.upvotes, t.created_at, \
         (SELECT COALESCE(json_agg(json_build_object('id', c.id, 'category_name', c.category_name, 'category_icon', c.category_icon) \
         ORDER BY c.category_name), '[]'::json) \
         FROM {} tc JOIN {} c ON c.id = tc.category_id WHERE tc.tool_id = t.id) AS categories",
        join, categories
    )
}

fn order_clause(view: EntriesView) -> &'static str {
    match view {
        EntriesView::Standard => " ORDER BY t.upvotes DESC, t.id ASC",
        EntriesView::RecentlyAdded => " ORDER BY t.created_at DESC, t.id DESC",
    }
}

fn page_clause(page: Page) -> String {
    format!(" LIMIT {} OFFSET {}", page.limit(), page.offset())
}

/// One page of tools in the given view.
pub fn select_entries(schema: &str, view: EntriesView, page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} t{}{}",
        tool_columns(schema),
        qualified_table(schema, "tools"),
        order_clause(view),
        page_clause(page)
    );
    q
}

/// One page of tools whose name or description contains the term, most votes first.
pub fn search_tools(schema: &str, term: &SearchTerm, page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(term.like_pattern());
    q.sql = format!(
        "SELECT {} FROM {} t WHERE t.name ILIKE ${n} OR t.description ILIKE ${n}{}{}",
        tool_columns(schema),
        qualified_table(schema, "tools"),
        order_clause(EntriesView::Standard),
        page_clause(page),
        n = n
    );
    q
}

pub fn count_tools(schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", qualified_table(schema, "tools"));
    q
}

pub fn select_category(schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT id, category_name, category_icon, category_description FROM {} WHERE id = ${}",
        qualified_table(schema, "categories"),
        n
    );
    q
}

/// Join rows of a category, each with the full tool row.
pub fn select_category_results(schema: &str, category_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(category_id);
    q.sql = format!(
        "SELECT tc.tool_id, tc.category_id, {} FROM {} tc JOIN {} t ON t.id = tc.tool_id \
         WHERE tc.category_id = ${} ORDER BY tc.tool_id",
        tool_columns(schema),
        qualified_table(schema, "tool_categories"),
        qualified_table(schema, "tools"),
        n
    );
    q
}

/// Current vote count, locking the tool row for the rest of the transaction.
pub fn lock_upvotes(schema: &str, tool_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(tool_id);
    q.sql = format!(
        "SELECT upvotes FROM {} WHERE id = ${} FOR UPDATE",
        qualified_table(schema, "tools"),
        n
    );
    q
}

pub fn insert_vote(schema: &str, user: uuid::Uuid, tool_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let u = q.push_param(user);
    let t = q.push_param(tool_id);
    q.sql = format!(
        "INSERT INTO {} (user_id, tool_id) VALUES (${}, ${}) ON CONFLICT DO NOTHING",
        qualified_table(schema, "tool_votes"),
        u,
        t
    );
    q
}

pub fn delete_vote(schema: &str, user: uuid::Uuid, tool_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let u = q.push_param(user);
    let t = q.push_param(tool_id);
    q.sql = format!(
        "DELETE FROM {} WHERE user_id = ${} AND tool_id = ${}",
        qualified_table(schema, "tool_votes"),
        u,
        t
    );
    q
}

/// Add `delta` to the vote count, floored at zero. Returns the new count.
pub fn adjust_upvotes(schema: &str, tool_id: i64, delta: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let d = q.push_param(delta);
    let id = q.push_param(tool_id);
    q.sql = format!(
        "UPDATE {} SET upvotes = GREATEST(upvotes + ${}, 0) WHERE id = ${} RETURNING upvotes",
        qualified_table(schema, "tools"),
        d,
        id
    );
    q
}
