//! Team-facing play endpoints: scans, progress, winner, hints,
//! heartbeats. All of them authenticate through the bearer session.

use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use trailmark_core::model::ClientMeta;
use trailmark_engine::validator;
use trailmark_engine::{HintOutcome, ScanOutcome, TeamProgress, WinnerStatus};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ScanRequest {
    node_key: String,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HintRequest {
    node_key: String,
}

fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    ClientMeta {
        ip: header_str("x-forwarded-for")
            .map(|chain| chain.split(',').next().unwrap_or("").trim().to_owned())
            .filter(|ip| !ip.is_empty()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}

/// POST /api/v1/scans
async fn record_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let team = auth::authenticate(&state, &headers).await?;
    let outcome = state
        .engine
        .record_scan(
            team.id,
            &body.node_key,
            body.password.as_deref(),
            client_meta(&headers),
        )
        .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/progress
async fn team_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TeamProgress>, ApiError> {
    let team = auth::authenticate(&state, &headers).await?;
    let progress = state.engine.team_progress(team.id).await?;
    Ok(Json(progress))
}

/// GET /api/v1/winner
async fn check_winner(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<WinnerStatus>, ApiError> {
    let team = auth::authenticate(&state, &headers).await?;
    let status = state.engine.check_winner(team.id).await?;
    Ok(Json(status))
}

/// POST /api/v1/hints
async fn reveal_hint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HintRequest>,
) -> Result<Json<HintOutcome>, ApiError> {
    let team = auth::authenticate(&state, &headers).await?;
    let outcome = state.engine.reveal_hint(team.id, &body.node_key).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/heartbeat
async fn heartbeat(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let team = auth::authenticate(&state, &headers).await?;
    let game = validator::require_game(state.games.as_ref(), team.game_id).await?;
    state.presence.heartbeat(team.id, &game.slug);
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the play router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scans", post(record_scan))
        .route("/progress", get(team_progress))
        .route("/winner", get(check_winner))
        .route("/hints", post(reveal_hint))
        .route("/heartbeat", post(heartbeat))
}
