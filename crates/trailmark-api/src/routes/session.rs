//! Join and logout endpoints.

use axum::http::{HeaderMap, StatusCode};
use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trailmark_core::model::Team;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct JoinRequest {
    game_slug: String,
    team_code: String,
}

/// Response to a successful join.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    /// The team the code resolved to.
    pub team: Team,
    /// The session token to present as a bearer token.
    pub token: String,
    /// When the session expires if never used.
    pub expires_at: DateTime<Utc>,
}

/// POST /api/v1/sessions/join
async fn join(
    State(state): State<AppState>,
    Json(body): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    let grant = state
        .sessions
        .join(&body.game_slug, &body.team_code)
        .await?;
    Ok(Json(JoinResponse {
        team: grant.team,
        token: grant.session.token,
        expires_at: grant.session.expires_at,
    }))
}

/// POST /api/v1/sessions/logout — idempotent; a missing or dead token
/// still yields 204.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = auth::bearer_token(&headers) {
        state.sessions.logout(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join", post(join))
        .route("/logout", post(logout))
}
