//! Teams and their authentication sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A playing team within a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// Unique-per-game join code, stored upper-case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Assigned start node, if any.
    pub start_node_id: Option<Uuid>,
    /// Optional logo URL shown on the leaderboard.
    pub logo_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A time-bounded authentication token bound to a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSession {
    /// Session identifier.
    pub id: Uuid,
    /// The team this session authenticates.
    pub team_id: Uuid,
    /// Opaque unique token.
    pub token: String,
    /// Expiry; slid forward on every validated use.
    pub expires_at: DateTime<Utc>,
}

/// Payload for creating a session row.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// The team to bind.
    pub team_id: Uuid,
    /// The issued token.
    pub token: String,
    /// Initial expiry.
    pub expires_at: DateTime<Utc>,
}
