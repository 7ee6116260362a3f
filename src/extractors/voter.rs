//! Extract the logged-in user from the `X-User-Id` header set by the upstream auth layer.

use crate::error::AppError;
use crate::models::Voter;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

pub const LOGIN_REQUIRED: &str = "You need to login first before voting!";

#[async_trait]
impl<S> FromRequestParts<S> for Voter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.into()))?;
        let id = uuid::Uuid::parse_str(raw)
            .map_err(|_| AppError::BadRequest(format!("invalid {} header", USER_ID_HEADER)))?;
        Ok(Voter(id))
    }
}
