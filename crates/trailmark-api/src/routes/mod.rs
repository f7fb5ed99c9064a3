//! Route modules and router assembly.

pub mod admin;
pub mod game;
pub mod health;
pub mod play;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Assembles the full application router. `main` adds its middleware
/// layers on top; integration tests use it as-is.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1", play::router())
        .nest("/api/v1/sessions", session::router())
        .nest("/api/v1/games", game::router())
        .nest("/api/v1/admin", admin::router())
        .with_state(state)
}
