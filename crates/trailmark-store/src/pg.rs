//! `PostgreSQL` implementation of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trailmark_core::error::HuntError;
use trailmark_core::model::{
    Edge, Game, GameStatus, HintUnlock, NewHintUnlock, NewScan, NewSession, Node, Scan, Team,
    TeamSession,
};
use trailmark_core::repository::{
    GameRepository, GraphRepository, HintRepository, ScanRepository, SessionRepository,
    TeamRepository,
};
use uuid::Uuid;

use crate::rows::{EdgeRow, GameRow, HintUnlockRow, NodeRow, ScanRow, SessionRow, TeamRow};

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_fault(what: &str, err: sqlx::Error) -> HuntError {
    HuntError::infrastructure(format!("failed to {what}: {err}"))
}

#[async_trait]
impl GameRepository for PgStore {
    async fn find_game(&self, id: Uuid) -> Result<Option<Game>, HuntError> {
        sqlx::query_as::<_, GameRow>(
            "SELECT id, name, slug, status, settings, created_at FROM games WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_fault("load game", e))?
        .map(Game::try_from)
        .transpose()
    }

    async fn find_game_by_slug(&self, slug: &str) -> Result<Option<Game>, HuntError> {
        sqlx::query_as::<_, GameRow>(
            "SELECT id, name, slug, status, settings, created_at FROM games WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_fault("load game by slug", e))?
        .map(Game::try_from)
        .transpose()
    }

    async fn update_game_status(&self, id: Uuid, status: GameStatus) -> Result<(), HuntError> {
        let result = sqlx::query("UPDATE games SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_fault("update game status", e))?;
        if result.rows_affected() == 0 {
            return Err(HuntError::GameNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl GraphRepository for PgStore {
    async fn nodes_for_game(&self, game_id: Uuid) -> Result<Vec<Node>, HuntError> {
        let rows = sqlx::query_as::<_, NodeRow>(
            r"
            SELECT id, game_id, node_key, title, content, password_hash,
                   is_start, is_end, points, hint, admin_note, metadata,
                   sort_order, created_at
            FROM nodes
            WHERE game_id = $1
            ORDER BY sort_order, created_at
            ",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load nodes", e))?;
        rows.into_iter().map(Node::try_from).collect()
    }

    async fn edges_for_game(&self, game_id: Uuid) -> Result<Vec<Edge>, HuntError> {
        let rows = sqlx::query_as::<_, EdgeRow>(
            r"
            SELECT id, game_id, from_node, to_node, condition, sort_order, created_at
            FROM edges
            WHERE game_id = $1
            ORDER BY sort_order, created_at
            ",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load edges", e))?;
        rows.into_iter().map(Edge::try_from).collect()
    }
}

#[async_trait]
impl TeamRepository for PgStore {
    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, HuntError> {
        let row = sqlx::query_as::<_, TeamRow>(
            r"
            SELECT id, game_id, code, name, start_node_id, logo_url, created_at
            FROM teams
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_fault("load team", e))?;
        Ok(row.map(Team::from))
    }

    async fn find_team_by_code(
        &self,
        game_id: Uuid,
        code: &str,
    ) -> Result<Option<Team>, HuntError> {
        let row = sqlx::query_as::<_, TeamRow>(
            r"
            SELECT id, game_id, code, name, start_node_id, logo_url, created_at
            FROM teams
            WHERE game_id = $1 AND code = $2
            ",
        )
        .bind(game_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_fault("load team by code", e))?;
        Ok(row.map(Team::from))
    }

    async fn teams_for_game(&self, game_id: Uuid) -> Result<Vec<Team>, HuntError> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r"
            SELECT id, game_id, code, name, start_node_id, logo_url, created_at
            FROM teams
            WHERE game_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load teams", e))?;
        Ok(rows.into_iter().map(Team::from).collect())
    }
}

#[async_trait]
impl ScanRepository for PgStore {
    async fn scans_for_team(&self, team_id: Uuid) -> Result<Vec<Scan>, HuntError> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r"
            SELECT id, game_id, team_id, node_id, scanned_at, points_awarded,
                   client_ip, user_agent
            FROM scans
            WHERE team_id = $1
            ORDER BY seq
            ",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load team scans", e))?;
        Ok(rows.into_iter().map(Scan::from).collect())
    }

    async fn scans_for_game(&self, game_id: Uuid) -> Result<Vec<Scan>, HuntError> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r"
            SELECT id, game_id, team_id, node_id, scanned_at, points_awarded,
                   client_ip, user_agent
            FROM scans
            WHERE game_id = $1
            ORDER BY seq
            ",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load game scans", e))?;
        Ok(rows.into_iter().map(Scan::from).collect())
    }

    async fn append_scan(&self, scan: NewScan) -> Result<Scan, HuntError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO scans (id, game_id, team_id, node_id, scanned_at,
                               points_awarded, client_ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(id)
        .bind(scan.game_id)
        .bind(scan.team_id)
        .bind(scan.node_id)
        .bind(scan.scanned_at)
        .bind(scan.points_awarded)
        .bind(&scan.client.ip)
        .bind(&scan.client.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|e| store_fault("append scan", e))?;

        Ok(Scan {
            id,
            game_id: scan.game_id,
            team_id: scan.team_id,
            node_id: scan.node_id,
            scanned_at: scan.scanned_at,
            points_awarded: scan.points_awarded,
            client: scan.client,
        })
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn create_session(&self, session: NewSession) -> Result<TeamSession, HuntError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO team_sessions (id, team_id, token, expires_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id)
        .bind(session.team_id)
        .bind(&session.token)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_fault("create session", e))?;

        Ok(TeamSession {
            id,
            team_id: session.team_id,
            token: session.token,
            expires_at: session.expires_at,
        })
    }

    async fn find_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<TeamSession>, HuntError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, team_id, token, expires_at FROM team_sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_fault("load session", e))?;
        Ok(row.map(TeamSession::from))
    }

    async fn extend_session(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<(), HuntError> {
        sqlx::query("UPDATE team_sessions SET expires_at = $1 WHERE id = $2")
            .bind(expires_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_fault("extend session", e))?;
        Ok(())
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<bool, HuntError> {
        let result = sqlx::query("DELETE FROM team_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| store_fault("delete session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, HuntError> {
        let result = sqlx::query("DELETE FROM team_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| store_fault("sweep sessions", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl HintRepository for PgStore {
    async fn unlocks_for_game(&self, game_id: Uuid) -> Result<Vec<HintUnlock>, HuntError> {
        let rows = sqlx::query_as::<_, HintUnlockRow>(
            r"
            SELECT id, game_id, team_id, node_id, cost, created_at
            FROM hint_unlocks
            WHERE game_id = $1
            ",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load game hint unlocks", e))?;
        Ok(rows.into_iter().map(HintUnlock::from).collect())
    }

    async fn unlocks_for_team(&self, team_id: Uuid) -> Result<Vec<HintUnlock>, HuntError> {
        let rows = sqlx::query_as::<_, HintUnlockRow>(
            r"
            SELECT id, game_id, team_id, node_id, cost, created_at
            FROM hint_unlocks
            WHERE team_id = $1
            ",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_fault("load team hint unlocks", e))?;
        Ok(rows.into_iter().map(HintUnlock::from).collect())
    }

    async fn record_unlock(&self, unlock: NewHintUnlock) -> Result<HintUnlock, HuntError> {
        // The unique (team_id, node_id) constraint makes this idempotent:
        // a concurrent or repeated reveal keeps the original row.
        sqlx::query(
            r"
            INSERT INTO hint_unlocks (id, game_id, team_id, node_id, cost, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (team_id, node_id) DO NOTHING
            ",
        )
        .bind(Uuid::new_v4())
        .bind(unlock.game_id)
        .bind(unlock.team_id)
        .bind(unlock.node_id)
        .bind(unlock.cost)
        .bind(unlock.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_fault("record hint unlock", e))?;

        let row = sqlx::query_as::<_, HintUnlockRow>(
            r"
            SELECT id, game_id, team_id, node_id, cost, created_at
            FROM hint_unlocks
            WHERE team_id = $1 AND node_id = $2
            ",
        )
        .bind(unlock.team_id)
        .bind(unlock.node_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_fault("load hint unlock", e))?;
        Ok(HintUnlock::from(row))
    }
}
