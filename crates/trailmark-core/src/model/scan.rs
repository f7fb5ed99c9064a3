//! Scan records and hint unlocks — the append-only progress log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client metadata captured with a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientMeta {
    /// Remote address, if known.
    pub ip: Option<String>,
    /// User agent, if supplied.
    pub user_agent: Option<String>,
}

/// An immutable record of a team reaching a node.
///
/// A team's ordered scan sequence is the authoritative progress record;
/// there is no separately mutated "current position".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    /// Scan identifier.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// The scanning team.
    pub team_id: Uuid,
    /// The scanned node.
    pub node_id: Uuid,
    /// When the scan was registered.
    pub scanned_at: DateTime<Utc>,
    /// Points awarded at the time of the scan.
    pub points_awarded: i32,
    /// Client metadata.
    pub client: ClientMeta,
}

/// Payload for appending a scan row.
#[derive(Debug, Clone)]
pub struct NewScan {
    /// Owning game.
    pub game_id: Uuid,
    /// The scanning team.
    pub team_id: Uuid,
    /// The scanned node.
    pub node_id: Uuid,
    /// When the scan was registered.
    pub scanned_at: DateTime<Utc>,
    /// Points awarded.
    pub points_awarded: i32,
    /// Client metadata.
    pub client: ClientMeta,
}

/// A recorded hint reveal; its cost is deducted from the team's total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintUnlock {
    /// Unlock identifier.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// The team that revealed the hint.
    pub team_id: Uuid,
    /// The node whose hint was revealed.
    pub node_id: Uuid,
    /// Points deducted, frozen at unlock time.
    pub cost: i32,
    /// When the hint was revealed.
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a hint unlock.
#[derive(Debug, Clone)]
pub struct NewHintUnlock {
    /// Owning game.
    pub game_id: Uuid,
    /// The revealing team.
    pub team_id: Uuid,
    /// The node whose hint is revealed.
    pub node_id: Uuid,
    /// Points to deduct.
    pub cost: i32,
    /// When the hint was revealed.
    pub created_at: DateTime<Utc>,
}
