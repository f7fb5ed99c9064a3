//! Nodes (checkpoints) and edges (legal transitions).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password;

/// Content revealed when a node is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeContent {
    /// Inline clue text.
    Text {
        /// The clue body.
        body: String,
    },
    /// An image URL.
    Image {
        /// Where the image lives.
        url: String,
    },
    /// A video URL.
    Video {
        /// Where the video lives.
        url: String,
    },
    /// An audio URL.
    Audio {
        /// Where the audio lives.
        url: String,
    },
    /// An external link.
    Link {
        /// The link target.
        url: String,
    },
}

/// A scannable checkpoint with content and a point value.
///
/// Identity (`id`, `key`) is immutable once any scan references the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// Unique per-game node key — the QR payload.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Content payload revealed on scan.
    pub content: NodeContent,
    /// One-way digest of the node's own password gate, if any.
    pub password_hash: Option<String>,
    /// Whether teams may begin the hunt here.
    pub is_start: bool,
    /// Whether the hunt can finish here.
    pub is_end: bool,
    /// Points awarded for scanning this node.
    pub points: i32,
    /// Optional hint text, revealed at a cost.
    pub hint: Option<String>,
    /// Admin-only annotation, never shown to teams.
    pub admin_note: Option<String>,
    /// Free-form authoring metadata.
    pub metadata: serde_json::Value,
    /// Tie-break ordering among sibling nodes.
    pub sort_order: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Whether this node carries its own password gate.
    #[must_use]
    pub fn requires_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Checks a supplied password against the node's gate. A node with no
    /// gate accepts anything, including nothing.
    #[must_use]
    pub fn password_matches(&self, supplied: Option<&str>) -> bool {
        match (&self.password_hash, supplied) {
            (None, _) => true,
            (Some(hash), Some(raw)) => password::verify(raw, hash),
            (Some(_), None) => false,
        }
    }
}

/// Condition gating an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeCondition {
    /// The transition is always allowed.
    Always,
    /// The transition requires a matching password.
    Password {
        /// One-way digest of the expected value.
        hash: String,
    },
}

impl EdgeCondition {
    /// Whether a supplied password (or its absence) satisfies the condition.
    #[must_use]
    pub fn is_satisfied(&self, supplied: Option<&str>) -> bool {
        match self {
            Self::Always => true,
            Self::Password { hash } => supplied.is_some_and(|raw| password::verify(raw, hash)),
        }
    }
}

/// A directed, optionally password-gated legal transition between nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Edge identifier.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// Source node.
    pub from_node: Uuid,
    /// Target node.
    pub to_node: Uuid,
    /// Gate on the transition.
    pub condition: EdgeCondition,
    /// Tie-break when multiple edges share a source node.
    pub sort_order: i32,
    /// Creation timestamp, the secondary ordering key.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::digest;

    #[test]
    fn test_always_condition_accepts_missing_password() {
        assert!(EdgeCondition::Always.is_satisfied(None));
        assert!(EdgeCondition::Always.is_satisfied(Some("anything")));
    }

    #[test]
    fn test_password_condition_requires_matching_value() {
        let condition = EdgeCondition::Password { hash: digest("open sesame") };
        assert!(condition.is_satisfied(Some("open sesame")));
        assert!(!condition.is_satisfied(Some("wrong")));
        assert!(!condition.is_satisfied(None));
    }

    #[test]
    fn test_condition_serde_is_tagged() {
        let json = serde_json::to_value(EdgeCondition::Always).unwrap();
        assert_eq!(json["kind"], "always");
        let json = serde_json::to_value(EdgeCondition::Password { hash: "ab".into() }).unwrap();
        assert_eq!(json["kind"], "password");
    }
}
