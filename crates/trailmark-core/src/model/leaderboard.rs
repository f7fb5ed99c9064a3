//! Derived leaderboard standings. Never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ranked row of a game's standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The ranked team.
    pub team_id: Uuid,
    /// Team display name.
    pub team_name: String,
    /// Team logo, if any.
    pub logo_url: Option<String>,
    /// Distinct nodes scanned.
    pub nodes_found: u32,
    /// Awarded points minus hint deductions.
    pub total_points: i64,
    /// Title of the node the team currently sits on.
    pub current_clue: Option<String>,
    /// Most recent scan time, if any.
    pub last_scan_at: Option<DateTime<Utc>>,
    /// Whether the team has completed the hunt.
    pub finished: bool,
    /// Dense 1-based rank; ties are already broken.
    pub rank: u32,
}
