//! Directory API routes, mounted under `/api`.

use crate::handlers::{category, get_entries, query_search, unvote, vote};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/querySearch/:term", get(query_search))
        .route("/getEntries", get(get_entries))
        .route("/category/:id", get(category))
        .route("/tools/:id/vote", post(vote).delete(unvote))
        .with_state(state)
}
