//! Administrative lifecycle transitions.

use std::sync::Arc;

use trailmark_core::error::HuntError;
use trailmark_core::model::{Game, GameStatus};
use trailmark_core::repository::{GameRepository, GraphRepository};
use trailmark_events::{EventBus, GameEvent};
use trailmark_graph::GraphView;

use crate::validator;

/// Drives draft → active → completed transitions.
pub struct GameAdmin {
    games: Arc<dyn GameRepository>,
    graph: Arc<dyn GraphRepository>,
    bus: Arc<EventBus>,
}

impl GameAdmin {
    /// Wires the admin operations to their collaborators.
    #[must_use]
    pub fn new(
        games: Arc<dyn GameRepository>,
        graph: Arc<dyn GraphRepository>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self { games, graph, bus }
    }

    /// Activates a draft game. Refused unless the graph has at least one
    /// node, one start node, and one end node.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::GameNotFound` for an unknown game,
    /// `Precondition` when the game is not a draft or the graph is not
    /// activatable, `Infrastructure` on store failure.
    pub async fn activate_game(&self, game_id: uuid::Uuid) -> Result<Game, HuntError> {
        let mut game = validator::require_game(self.games.as_ref(), game_id).await?;
        validator::require_status(&game, &[GameStatus::Draft])?;
        let view = GraphView::load(self.graph.as_ref(), game_id).await?;
        validator::ensure_can_activate(&view)?;

        self.games
            .update_game_status(game_id, GameStatus::Active)
            .await?;
        game.status = GameStatus::Active;
        tracing::info!(slug = %game.slug, "game activated");
        self.bus.publish(
            &game.slug,
            GameEvent::GameStatus {
                status: GameStatus::Active,
            },
        );
        Ok(game)
    }

    /// Completes an active game. Terminal for ranking purposes.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::GameNotFound` for an unknown game,
    /// `Precondition` when the game is not active, `Infrastructure` on
    /// store failure.
    pub async fn complete_game(&self, game_id: uuid::Uuid) -> Result<Game, HuntError> {
        let mut game = validator::require_game(self.games.as_ref(), game_id).await?;
        validator::require_status(&game, &[GameStatus::Active])?;

        self.games
            .update_game_status(game_id, GameStatus::Completed)
            .await?;
        game.status = GameStatus::Completed;
        tracing::info!(slug = %game.slug, "game completed");
        self.bus.publish(
            &game.slug,
            GameEvent::GameStatus {
                status: GameStatus::Completed,
            },
        );
        Ok(game)
    }
}
