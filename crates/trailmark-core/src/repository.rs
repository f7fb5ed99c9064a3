//! Repository traits over the persistent store.
//!
//! One trait per storage concern. Absence is an `Ok(None)` / empty `Vec`
//! result, never an error — callers decide whether absence matters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::HuntError;
use crate::model::{
    Edge, Game, GameStatus, HintUnlock, NewHintUnlock, NewScan, NewSession, Node, Scan, Team,
    TeamSession,
};

/// Game lookups and status transitions.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Finds a game by id.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn find_game(&self, id: Uuid) -> Result<Option<Game>, HuntError>;

    /// Finds a game by its public slug.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn find_game_by_slug(&self, slug: &str) -> Result<Option<Game>, HuntError>;

    /// Updates a game's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn update_game_status(&self, id: Uuid, status: GameStatus) -> Result<(), HuntError>;
}

/// Read access to a game's authored graph.
#[async_trait]
pub trait GraphRepository: Send + Sync {
    /// All nodes of a game.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn nodes_for_game(&self, game_id: Uuid) -> Result<Vec<Node>, HuntError>;

    /// All edges of a game.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn edges_for_game(&self, game_id: Uuid) -> Result<Vec<Edge>, HuntError>;
}

/// Team lookups.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Finds a team by id.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, HuntError>;

    /// Finds a team by its join code within a game. `code` is already
    /// upper-cased by the caller.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn find_team_by_code(&self, game_id: Uuid, code: &str)
    -> Result<Option<Team>, HuntError>;

    /// All teams of a game.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn teams_for_game(&self, game_id: Uuid) -> Result<Vec<Team>, HuntError>;
}

/// The append-only scan log.
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// A team's scans in append order, oldest first. Append order is the
    /// authoritative sequence; timestamps may tie.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn scans_for_team(&self, team_id: Uuid) -> Result<Vec<Scan>, HuntError>;

    /// All scans of a game, same ordering.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn scans_for_game(&self, game_id: Uuid) -> Result<Vec<Scan>, HuntError>;

    /// Appends one scan row and returns it.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn append_scan(&self, scan: NewScan) -> Result<Scan, HuntError>;
}

/// Session issuance, renewal, and removal.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates a session row and returns it.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn create_session(&self, session: NewSession) -> Result<TeamSession, HuntError>;

    /// Finds a session by token, expired or not.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn find_session_by_token(&self, token: &str)
    -> Result<Option<TeamSession>, HuntError>;

    /// Slides a session's expiry forward.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn extend_session(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<(), HuntError>;

    /// Deletes a session by token; returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn delete_session_by_token(&self, token: &str) -> Result<bool, HuntError>;

    /// Removes sessions expired as of `now`; returns the count removed.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, HuntError>;
}

/// Recorded hint reveals.
#[async_trait]
pub trait HintRepository: Send + Sync {
    /// All unlocks within a game.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn unlocks_for_game(&self, game_id: Uuid) -> Result<Vec<HintUnlock>, HuntError>;

    /// All unlocks by a team.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn unlocks_for_team(&self, team_id: Uuid) -> Result<Vec<HintUnlock>, HuntError>;

    /// Records an unlock. Idempotent per (team, node): if a row already
    /// exists it is returned unchanged and no new deduction occurs.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    async fn record_unlock(&self, unlock: NewHintUnlock) -> Result<HintUnlock, HuntError>;
}
