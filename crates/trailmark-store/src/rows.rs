//! Row structs and their conversions into domain types.
//!
//! Variant-bearing columns (settings, content, conditions) are JSONB;
//! a row that fails to decode is corrupted data and surfaces as an
//! infrastructure fault, never a silent default.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use trailmark_core::error::HuntError;
use trailmark_core::model::{
    ClientMeta, Edge, EdgeCondition, Game, GameSettings, GameStatus, HintUnlock, Node,
    NodeContent, Scan, Team, TeamSession,
};
use uuid::Uuid;

fn corrupted(what: &str, detail: impl std::fmt::Display) -> HuntError {
    HuntError::infrastructure(format!("corrupted {what} row: {detail}"))
}

#[derive(Debug, FromRow)]
pub(crate) struct GameRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub status: String,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GameRow> for Game {
    type Error = HuntError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let status = GameStatus::parse(&row.status)
            .ok_or_else(|| corrupted("game", format!("unknown status '{}'", row.status)))?;
        let settings: GameSettings =
            serde_json::from_value(row.settings).map_err(|e| corrupted("game", e))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            status,
            settings,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct NodeRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub node_key: String,
    pub title: String,
    pub content: serde_json::Value,
    pub password_hash: Option<String>,
    pub is_start: bool,
    pub is_end: bool,
    pub points: i32,
    pub hint: Option<String>,
    pub admin_note: Option<String>,
    pub metadata: serde_json::Value,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NodeRow> for Node {
    type Error = HuntError;

    fn try_from(row: NodeRow) -> Result<Self, Self::Error> {
        let content: NodeContent =
            serde_json::from_value(row.content).map_err(|e| corrupted("node", e))?;
        Ok(Self {
            id: row.id,
            game_id: row.game_id,
            key: row.node_key,
            title: row.title,
            content,
            password_hash: row.password_hash,
            is_start: row.is_start,
            is_end: row.is_end,
            points: row.points,
            hint: row.hint,
            admin_note: row.admin_note,
            metadata: row.metadata,
            sort_order: row.sort_order,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EdgeRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub from_node: Uuid,
    pub to_node: Uuid,
    pub condition: serde_json::Value,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EdgeRow> for Edge {
    type Error = HuntError;

    fn try_from(row: EdgeRow) -> Result<Self, Self::Error> {
        let condition: EdgeCondition =
            serde_json::from_value(row.condition).map_err(|e| corrupted("edge", e))?;
        Ok(Self {
            id: row.id,
            game_id: row.game_id,
            from_node: row.from_node,
            to_node: row.to_node,
            condition,
            sort_order: row.sort_order,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub code: String,
    pub name: String,
    pub start_node_id: Option<Uuid>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            game_id: row.game_id,
            code: row.code,
            name: row.name,
            start_node_id: row.start_node_id,
            logo_url: row.logo_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ScanRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub team_id: Uuid,
    pub node_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub points_awarded: i32,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl From<ScanRow> for Scan {
    fn from(row: ScanRow) -> Self {
        Self {
            id: row.id,
            game_id: row.game_id,
            team_id: row.team_id,
            node_id: row.node_id,
            scanned_at: row.scanned_at,
            points_awarded: row.points_awarded,
            client: ClientMeta {
                ip: row.client_ip,
                user_agent: row.user_agent,
            },
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SessionRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionRow> for TeamSession {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            team_id: row.team_id,
            token: row.token,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct HintUnlockRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub team_id: Uuid,
    pub node_id: Uuid,
    pub cost: i32,
    pub created_at: DateTime<Utc>,
}

impl From<HintUnlockRow> for HintUnlock {
    fn from(row: HintUnlockRow) -> Self {
        Self {
            id: row.id,
            game_id: row.game_id,
            team_id: row.team_id,
            node_id: row.node_id,
            cost: row.cost,
            created_at: row.created_at,
        }
    }
}
