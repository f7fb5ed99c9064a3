//! Shared precondition checks.
//!
//! Every component resolves existence and status through these helpers
//! so failure messages stay consistent game-wide.

use trailmark_core::error::HuntError;
use trailmark_core::model::{Game, GameStatus, Team};
use trailmark_core::repository::{GameRepository, TeamRepository};
use trailmark_graph::GraphView;
use uuid::Uuid;

/// Resolves a game or fails with `GameNotFound`.
///
/// # Errors
///
/// Returns `HuntError::GameNotFound` if absent, `Infrastructure` on
/// store failure.
pub async fn require_game(games: &dyn GameRepository, id: Uuid) -> Result<Game, HuntError> {
    games.find_game(id).await?.ok_or(HuntError::GameNotFound)
}

/// Resolves a game by slug or fails with `GameNotFound`.
///
/// # Errors
///
/// Returns `HuntError::GameNotFound` if absent, `Infrastructure` on
/// store failure.
pub async fn require_game_by_slug(
    games: &dyn GameRepository,
    slug: &str,
) -> Result<Game, HuntError> {
    games
        .find_game_by_slug(slug)
        .await?
        .ok_or(HuntError::GameNotFound)
}

/// Resolves a team or fails with `TeamNotFound`.
///
/// # Errors
///
/// Returns `HuntError::TeamNotFound` if absent, `Infrastructure` on
/// store failure.
pub async fn require_team(teams: &dyn TeamRepository, id: Uuid) -> Result<Team, HuntError> {
    teams.find_team(id).await?.ok_or(HuntError::TeamNotFound)
}

/// Resolves a team together with its game.
///
/// # Errors
///
/// Returns `HuntError::TeamNotFound` / `GameNotFound` if either is
/// absent, `Infrastructure` on store failure.
pub async fn require_team_and_game(
    teams: &dyn TeamRepository,
    games: &dyn GameRepository,
    team_id: Uuid,
) -> Result<(Team, Game), HuntError> {
    let team = require_team(teams, team_id).await?;
    let game = require_game(games, team.game_id).await?;
    Ok((team, game))
}

/// Checks a game's status against an allowed set.
///
/// # Errors
///
/// Returns `HuntError::Precondition` naming the required status.
pub fn require_status(game: &Game, allowed: &[GameStatus]) -> Result<(), HuntError> {
    if allowed.contains(&game.status) {
        Ok(())
    } else {
        let wanted: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
        Err(HuntError::precondition(format!(
            "game '{}' is {}, expected {}",
            game.slug,
            game.status.as_str(),
            wanted.join(" or ")
        )))
    }
}

/// Checks that a graph is activatable: at least one node, one start
/// node, and one end node. The first unmet condition's message is
/// returned.
///
/// # Errors
///
/// Returns `HuntError::Precondition` describing the first missing
/// requirement.
pub fn ensure_can_activate(view: &GraphView) -> Result<(), HuntError> {
    if view.node_count() == 0 {
        return Err(HuntError::precondition("game has no nodes"));
    }
    if view.start_nodes().is_empty() {
        return Err(HuntError::precondition("game has no start node"));
    }
    if view.end_nodes().is_empty() {
        return Err(HuntError::precondition("game has no end node"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use trailmark_test_support::fixtures;

    use super::*;

    #[test]
    fn test_require_status_names_expected_statuses() {
        let game = fixtures::draft_game("demo");
        let err = require_status(&game, &[GameStatus::Active]).unwrap_err();
        assert_eq!(err.to_string(), "game 'demo' is draft, expected active");
        assert!(require_status(&game, &[GameStatus::Draft, GameStatus::Active]).is_ok());
    }

    #[test]
    fn test_ensure_can_activate_reports_first_unmet_condition() {
        let game_id = uuid::Uuid::new_v4();

        let empty = GraphView::new(game_id, vec![], vec![]);
        assert_eq!(
            ensure_can_activate(&empty).unwrap_err().to_string(),
            "game has no nodes"
        );

        let plain = fixtures::node(game_id, "a", 0);
        let no_start = GraphView::new(game_id, vec![plain.clone()], vec![]);
        assert_eq!(
            ensure_can_activate(&no_start).unwrap_err().to_string(),
            "game has no start node"
        );

        let mut start = fixtures::node(game_id, "s", 0);
        start.is_start = true;
        let no_end = GraphView::new(game_id, vec![start.clone()], vec![]);
        assert_eq!(
            ensure_can_activate(&no_end).unwrap_err().to_string(),
            "game has no end node"
        );

        let mut end = fixtures::node(game_id, "e", 0);
        end.is_end = true;
        let ready = GraphView::new(game_id, vec![start, end], vec![]);
        assert!(ensure_can_activate(&ready).is_ok());
    }
}
