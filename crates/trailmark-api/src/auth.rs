//! Bearer-token session authentication.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use trailmark_core::error::HuntError;
use trailmark_core::model::Team;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the bearer token to a team, sliding the session window
/// forward as a side effect.
///
/// # Errors
///
/// Returns a 401-mapped `SessionInvalid` for a missing, unknown, or
/// expired token.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Team, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError(HuntError::SessionInvalid))?;
    state.sessions.validate(token).await.map_err(ApiError)
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
