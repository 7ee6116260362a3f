//! Tool listings: text search and the two paginated views.

use crate::error::AppError;
use crate::models::Tool;
use crate::pagination::Page;
use crate::response::EntriesBody;
use crate::search::SearchTerm;
use crate::state::AppState;
use crate::view::EntriesView;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;

/// `GET /api/querySearch/:term?page=N`. Terms of three characters or fewer return no rows.
pub async fn query_search(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Tool>>, AppError> {
    let page = Page::from_query(params.get("page").map(String::as_str))?;
    let term = SearchTerm::parse(&raw);
    if !term.is_searchable() {
        tracing::debug!(term = %term.as_str(), "search term too short");
        return Ok(Json(Vec::new()));
    }
    let tools = state.store.search(&term, page).await?;
    tracing::debug!(term = %term.as_str(), page = page.number(), hits = tools.len(), "search");
    Ok(Json(tools))
}

/// `GET /api/getEntries?get={standard|recentlyAdded}&page=N`.
pub async fn get_entries(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<EntriesBody>, AppError> {
    let view = EntriesView::from_query(params.get("get").map(String::as_str))?;
    let page = Page::from_query(params.get("page").map(String::as_str))?;
    let tools = state.store.entries(view, page).await?;
    let count = state.store.count().await?;
    Ok(Json(EntriesBody { tools, count }))
}
