//! Game aggregate and its settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Being authored; not joinable or scannable.
    Draft,
    /// Live: teams may join and scan.
    Active,
    /// Terminal for ranking purposes; history is retained.
    Completed,
}

impl GameStatus {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Parses the storage string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// How standings are ordered within the finished/unfinished groups.
///
/// Unrecognized values deserialize to `Points`, the fallback behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RankingMode {
    /// More distinct nodes found first.
    Nodes,
    /// Earlier last-scan time first.
    Time,
    /// Higher total points first.
    #[default]
    Points,
}

impl From<String> for RankingMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "nodes" => Self::Nodes,
            "time" => Self::Time,
            _ => Self::Points,
        }
    }
}

/// Optional speed bonus applied when consecutive scans are close together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBonus {
    /// Maximum elapsed seconds since the previous scan for the bonus to apply.
    pub window_secs: i64,
    /// Point multiplier, rounded to the nearest integer after applying.
    pub multiplier: f64,
}

/// Per-game tuning knobs, authored upstream and stored as a JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Leaderboard ordering mode.
    pub ranking_mode: RankingMode,
    /// Default point value for nodes authored without one.
    pub base_points: i32,
    /// Speed bonus, if enabled.
    pub time_bonus: Option<TimeBonus>,
    /// When set, the graph degenerates to a flat pool: any node is
    /// reachable from any state.
    pub random_mode: bool,
    /// Points deducted per revealed hint; zero disables deductions.
    pub hint_cost: i32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            ranking_mode: RankingMode::Points,
            base_points: 100,
            time_bonus: None,
            random_mode: false,
            hint_cost: 0,
        }
    }
}

/// A scavenger-hunt game: a named graph of nodes with a public slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique public slug used in URLs and event topics.
    pub slug: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Tuning knobs.
    pub settings: GameSettings,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_ranking_mode_falls_back_to_points() {
        let mode: RankingMode = serde_json::from_str("\"speedrun\"").unwrap();
        assert_eq!(mode, RankingMode::Points);
    }

    #[test]
    fn test_settings_deserialize_from_empty_object() {
        let settings: GameSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn test_status_round_trips_through_storage_form() {
        for status in [GameStatus::Draft, GameStatus::Active, GameStatus::Completed] {
            assert_eq!(GameStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(GameStatus::parse("archived"), None);
    }
}
