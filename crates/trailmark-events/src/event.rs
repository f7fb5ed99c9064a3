//! Event kinds and payloads broadcast to game viewers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trailmark_core::model::{GameStatus, LeaderboardEntry};
use uuid::Uuid;

/// Topic families a viewer can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// A team registered a node.
    Scan,
    /// Standings were recomputed.
    Leaderboard,
    /// A team chat message.
    Chat,
    /// The game's lifecycle status changed.
    GameStatus,
    /// A team joined the game.
    TeamJoined,
    /// A team's connection liveness changed.
    TeamConnection,
}

impl EventKind {
    /// Stable string form used in SSE event names and URLs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Leaderboard => "leaderboard",
            Self::Chat => "chat",
            Self::GameStatus => "game-status",
            Self::TeamJoined => "team-joined",
            Self::TeamConnection => "team-connection",
        }
    }

    /// Parses the string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scan" => Some(Self::Scan),
            "leaderboard" => Some(Self::Leaderboard),
            "chat" => Some(Self::Chat),
            "game-status" => Some(Self::GameStatus),
            "team-joined" => Some(Self::TeamJoined),
            "team-connection" => Some(Self::TeamConnection),
            _ => None,
        }
    }
}

/// An event published to one game's viewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    /// A successful scan.
    Scan {
        /// The scanning team.
        team_id: Uuid,
        /// Team display name.
        team_name: String,
        /// The scanned node.
        node_id: Uuid,
        /// Node title.
        node_title: String,
        /// Points awarded by this scan.
        points_awarded: i32,
        /// When the scan was registered.
        scanned_at: DateTime<Utc>,
    },
    /// Freshly recomputed standings.
    Leaderboard {
        /// The full ranked board.
        entries: Vec<LeaderboardEntry>,
    },
    /// A chat message.
    Chat {
        /// The sending team.
        team_id: Uuid,
        /// Team display name.
        team_name: String,
        /// Message body.
        message: String,
        /// When the message was sent.
        sent_at: DateTime<Utc>,
    },
    /// A game lifecycle transition.
    GameStatus {
        /// The new status.
        status: GameStatus,
    },
    /// A team joined.
    TeamJoined {
        /// The joining team.
        team_id: Uuid,
        /// Team display name.
        team_name: String,
    },
    /// A team's liveness transition. Published exactly once per
    /// transition, never repeated while the state holds.
    TeamConnection {
        /// The team whose liveness changed.
        team_id: Uuid,
        /// The new state.
        connected: bool,
    },
}

impl GameEvent {
    /// The topic family this event belongs to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scan { .. } => EventKind::Scan,
            Self::Leaderboard { .. } => EventKind::Leaderboard,
            Self::Chat { .. } => EventKind::Chat,
            Self::GameStatus { .. } => EventKind::GameStatus,
            Self::TeamJoined { .. } => EventKind::TeamJoined,
            Self::TeamConnection { .. } => EventKind::TeamConnection,
        }
    }
}
