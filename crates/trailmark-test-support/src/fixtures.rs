//! Fixture builders for domain objects.
//!
//! Builders return plain structs; tests adjust fields with struct-update
//! syntax where a scenario needs something specific.

use chrono::{DateTime, TimeZone, Utc};
use trailmark_core::model::{
    Edge, EdgeCondition, Game, GameSettings, GameStatus, Node, NodeContent, Team,
};
use uuid::Uuid;

/// The fixed timestamp all fixtures are anchored to.
#[must_use]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// An active game with default settings.
#[must_use]
pub fn active_game(slug: &str) -> Game {
    Game {
        id: Uuid::new_v4(),
        name: format!("Game {slug}"),
        slug: slug.to_owned(),
        status: GameStatus::Active,
        settings: GameSettings::default(),
        created_at: t0(),
    }
}

/// A draft game with default settings.
#[must_use]
pub fn draft_game(slug: &str) -> Game {
    Game {
        status: GameStatus::Draft,
        ..active_game(slug)
    }
}

/// A plain text-content node, neither start nor end.
#[must_use]
pub fn node(game_id: Uuid, key: &str, points: i32) -> Node {
    Node {
        id: Uuid::new_v4(),
        game_id,
        key: key.to_owned(),
        title: format!("Node {key}"),
        content: NodeContent::Text {
            body: format!("Clue at {key}"),
        },
        password_hash: None,
        is_start: false,
        is_end: false,
        points,
        hint: None,
        admin_note: None,
        metadata: serde_json::Value::Null,
        sort_order: 0,
        created_at: t0(),
    }
}

/// An unconditioned edge with the given sort order.
#[must_use]
pub fn edge(game_id: Uuid, from_node: Uuid, to_node: Uuid, sort_order: i32) -> Edge {
    Edge {
        id: Uuid::new_v4(),
        game_id,
        from_node,
        to_node,
        condition: EdgeCondition::Always,
        sort_order,
        created_at: t0(),
    }
}

/// A team with an upper-cased join code and no assigned start node.
#[must_use]
pub fn team(game_id: Uuid, code: &str, name: &str) -> Team {
    Team {
        id: Uuid::new_v4(),
        game_id,
        code: code.to_uppercase(),
        name: name.to_owned(),
        start_node_id: None,
        logo_url: None,
        created_at: t0(),
    }
}
