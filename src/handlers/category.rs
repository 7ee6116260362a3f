//! Category lookup.

use crate::error::AppError;
use crate::response::CategoryBody;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// `GET /api/category/:id`. An unknown id yields `categoryData: null` and no results.
pub async fn category(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<CategoryBody>, AppError> {
    let id: i64 = id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid category id: {}", id_str)))?;
    let category_results = state.store.category_results(id).await?;
    let category_data = state.store.category(id).await?;
    Ok(Json(CategoryBody {
        category_data,
        category_results,
    }))
}
