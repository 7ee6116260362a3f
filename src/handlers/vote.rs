//! Vote and unvote, gated on a logged-in user.

use crate::error::AppError;
use crate::models::{VoteOutcome, Voter};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

fn parse_tool_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid tool id: {}", id_str)))
}

/// `POST /api/tools/:id/vote`.
pub async fn vote(
    State(state): State<AppState>,
    voter: Voter,
    Path(id_str): Path<String>,
) -> Result<Json<VoteOutcome>, AppError> {
    let tool_id = parse_tool_id(&id_str)?;
    Ok(Json(state.store.vote(voter, tool_id).await?))
}

/// `DELETE /api/tools/:id/vote`.
pub async fn unvote(
    State(state): State<AppState>,
    voter: Voter,
    Path(id_str): Path<String>,
) -> Result<Json<VoteOutcome>, AppError> {
    let tool_id = parse_tool_id(&id_str)?;
    Ok(Json(state.store.unvote(voter, tool_id).await?))
}
