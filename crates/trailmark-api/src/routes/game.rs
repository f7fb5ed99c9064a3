//! Viewer-facing game endpoints: leaderboard, chat, and the SSE event
//! stream.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use trailmark_core::error::HuntError;
use trailmark_core::model::LeaderboardEntry;
use trailmark_engine::validator;
use trailmark_events::{EventKind, GameEvent};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

/// GET /api/v1/games/{slug}/leaderboard
async fn leaderboard(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let game = validator::require_game_by_slug(state.games.as_ref(), &slug).await?;
    let entries = state.ranking.leaderboard(game.id).await?;
    Ok(Json(entries))
}

/// POST /api/v1/games/{slug}/chat
async fn chat(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<StatusCode, ApiError> {
    let team = auth::authenticate(&state, &headers).await?;
    let game = validator::require_game_by_slug(state.games.as_ref(), &slug).await?;
    if team.game_id != game.id {
        return Err(ApiError(HuntError::precondition(
            "team does not belong to this game",
        )));
    }
    state.bus.publish(
        &game.slug,
        GameEvent::Chat {
            team_id: team.id,
            team_name: team.name,
            message: body.message,
            sent_at: state.clock.now(),
        },
    );
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/v1/games/{slug}/events/{kind}
///
/// A long-lived SSE stream over one (game, kind) topic. Dropping the
/// connection drops the receiver, which deregisters the subscription.
async fn events(
    State(state): State<AppState>,
    Path((slug, kind)): Path<(String, String)>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let game = validator::require_game_by_slug(state.games.as_ref(), &slug).await?;
    let kind = EventKind::parse(&kind)
        .ok_or_else(|| ApiError(HuntError::precondition(format!("unknown event kind '{kind}'"))))?;

    let receiver = state.bus.subscribe(&game.slug, kind);
    let stream = BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(event) => Some(
            Event::default()
                .event(event.kind().as_str())
                .json_data(&event),
        ),
        // A lagged subscriber lost the oldest events; skip the gap and
        // keep streaming.
        Err(_) => None,
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}

/// Returns the game router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}/leaderboard", get(leaderboard))
        .route("/{slug}/chat", post(chat))
        .route("/{slug}/events/{kind}", get(events))
}
