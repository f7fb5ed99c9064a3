//! Structured results returned to the transport layer.
//!
//! Scan-legality failures are data, not errors: the client renders the
//! message inline and the engine reserves `Err` for infrastructure
//! faults.

use chrono::{DateTime, Utc};
use serde::Serialize;
use trailmark_core::model::{Node, NodeContent, Scan, Team};
use uuid::Uuid;

/// Why a scan was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanRejection {
    /// The team id resolved to nothing.
    TeamNotFound,
    /// The team's game vanished.
    GameNotFound,
    /// The game is not in its active window.
    GameNotActive,
    /// No node with that key in this game — also the shield against
    /// cross-game QR codes.
    NodeNotFound,
    /// No satisfied edge from the team's current node to the scanned
    /// one.
    IllegalTransition,
    /// The node's own gate wants a (correct) password. Not a hard
    /// failure: the UI re-prompts.
    PasswordRequired,
}

impl ScanRejection {
    /// The message surfaced verbatim to the player.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::TeamNotFound => "Team not found",
            Self::GameNotFound => "Game not found",
            Self::GameNotActive => "This hunt is not currently active",
            Self::NodeNotFound => "That code does not belong to this hunt",
            Self::IllegalTransition => "You cannot reach that checkpoint from here",
            Self::PasswordRequired => "This checkpoint requires a password",
        }
    }
}

/// Full reveal of a scanned node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeReveal {
    /// Node identifier.
    pub id: Uuid,
    /// Public key (QR payload).
    pub key: String,
    /// Display title.
    pub title: String,
    /// The content unlocked by the scan.
    pub content: NodeContent,
    /// Configured point value.
    pub points: i32,
    /// Whether a hint can be bought for this node.
    pub hint_available: bool,
}

impl From<&Node> for NodeReveal {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            key: node.key.clone(),
            title: node.title.clone(),
            content: node.content.clone(),
            points: node.points,
            hint_available: node.hint.is_some(),
        }
    }
}

/// A next-move candidate. Deliberately shallow: content is revealed by
/// scanning, never by listing.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    /// Node identifier.
    pub id: Uuid,
    /// Public key (QR payload).
    pub key: String,
    /// Display title.
    pub title: String,
    /// Configured point value.
    pub points: i32,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            key: node.key.clone(),
            title: node.title.clone(),
            points: node.points,
        }
    }
}

/// The result of a scan attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Whether the scan registered (or replayed) successfully.
    pub success: bool,
    /// Message for the player, surfaced verbatim.
    pub message: String,
    /// Refusal reason, when `success` is false.
    pub rejection: Option<ScanRejection>,
    /// The scanned node, revealed on success and on duplicate replay.
    pub node: Option<NodeReveal>,
    /// Legal next moves after this scan.
    pub next_nodes: Vec<NodeSummary>,
    /// Whether this scan completed the hunt for the team.
    pub is_game_complete: bool,
    /// Points awarded — the original award on a duplicate replay.
    pub points_awarded: i32,
    /// Whether the node's own password gate is unsatisfied.
    pub password_required: bool,
    /// Whether this was an idempotent replay of an earlier scan.
    pub duplicate: bool,
}

impl ScanOutcome {
    pub(crate) fn rejected(rejection: ScanRejection) -> Self {
        Self {
            success: false,
            message: rejection.message().to_owned(),
            rejection: Some(rejection),
            node: None,
            next_nodes: Vec::new(),
            is_game_complete: false,
            points_awarded: 0,
            password_required: rejection == ScanRejection::PasswordRequired,
            duplicate: false,
        }
    }

    pub(crate) fn registered(
        node: NodeReveal,
        points_awarded: i32,
        next_nodes: Vec<NodeSummary>,
        is_game_complete: bool,
    ) -> Self {
        Self {
            success: true,
            message: format!("Checkpoint found: {}", node.title),
            rejection: None,
            node: Some(node),
            next_nodes,
            is_game_complete,
            points_awarded,
            password_required: false,
            duplicate: false,
        }
    }

    pub(crate) fn replayed(
        node: NodeReveal,
        points_awarded: i32,
        next_nodes: Vec<NodeSummary>,
        is_game_complete: bool,
    ) -> Self {
        Self {
            success: true,
            message: format!("Already scanned: {}", node.title),
            rejection: None,
            node: Some(node),
            next_nodes,
            is_game_complete,
            points_awarded,
            password_required: false,
            duplicate: true,
        }
    }
}

/// The result of a hint request.
#[derive(Debug, Clone, Serialize)]
pub struct HintOutcome {
    /// Whether a hint was revealed.
    pub success: bool,
    /// Message for the player.
    pub message: String,
    /// The hint text, when revealed.
    pub hint: Option<String>,
    /// Points deducted for this reveal (zero on a repeat reveal).
    pub cost: i32,
}

/// A team's full derived progress.
#[derive(Debug, Clone, Serialize)]
pub struct TeamProgress {
    /// The team.
    pub team: Team,
    /// The ordered scan history.
    pub scans: Vec<Scan>,
    /// The node the team currently sits on.
    pub current_node: Option<NodeReveal>,
    /// Title of the first next-move candidate.
    pub next_clue: Option<String>,
    /// Legal next moves.
    pub next_nodes: Vec<NodeSummary>,
    /// Awarded points minus hint deductions.
    pub total_points: i64,
    /// Distinct nodes scanned.
    pub nodes_found: u32,
    /// Whether the team has completed the hunt.
    pub is_finished: bool,
}

/// Win status for one team.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WinnerStatus {
    /// Whether this team finished first.
    pub is_winner: bool,
    /// When the team completed the hunt, if it has.
    pub completed_at: Option<DateTime<Utc>>,
}
