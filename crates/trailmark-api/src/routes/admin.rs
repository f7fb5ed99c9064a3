//! Administrative lifecycle endpoints.
//!
//! Admin authentication lives upstream (reverse proxy / admin-code
//! layer); these endpoints only drive the transitions.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use trailmark_core::model::Game;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/admin/games/{id}/activate
async fn activate_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Game>, ApiError> {
    let game = state.admin.activate_game(id).await?;
    Ok(Json(game))
}

/// POST /api/v1/admin/games/{id}/complete
async fn complete_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Game>, ApiError> {
    let game = state.admin.complete_game(id).await?;
    Ok(Json(game))
}

/// Returns the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games/{id}/activate", post(activate_game))
        .route("/games/{id}/complete", post(complete_game))
}
