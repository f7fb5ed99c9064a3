//! In-memory store — implements every repository trait over a single
//! mutex-guarded map, for engine and API tests that need a working store
//! without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
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

#[derive(Debug, Default)]
struct Inner {
    games: HashMap<Uuid, Game>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    teams: Vec<Team>,
    scans: Vec<Scan>,
    sessions: Vec<TeamSession>,
    unlocks: Vec<HintUnlock>,
}

/// A fully functional in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a game.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_game(&self, game: Game) {
        self.inner.lock().unwrap().games.insert(game.id, game);
    }

    /// Seeds a node.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_node(&self, node: Node) {
        self.inner.lock().unwrap().nodes.push(node);
    }

    /// Seeds an edge.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_edge(&self, edge: Edge) {
        self.inner.lock().unwrap().edges.push(edge);
    }

    /// Seeds a team.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_team(&self, team: Team) {
        self.inner.lock().unwrap().teams.push(team);
    }

    /// Number of stored sessions, expired or not.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.inner.lock().unwrap().sessions.len()
    }

    /// Number of stored scans across all teams.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.inner.lock().unwrap().scans.len()
    }
}

#[async_trait]
impl GameRepository for MemoryStore {
    async fn find_game(&self, id: Uuid) -> Result<Option<Game>, HuntError> {
        Ok(self.inner.lock().unwrap().games.get(&id).cloned())
    }

    async fn find_game_by_slug(&self, slug: &str) -> Result<Option<Game>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .games
            .values()
            .find(|g| g.slug == slug)
            .cloned())
    }

    async fn update_game_status(&self, id: Uuid, status: GameStatus) -> Result<(), HuntError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.games.get_mut(&id) {
            Some(game) => {
                game.status = status;
                Ok(())
            }
            None => Err(HuntError::GameNotFound),
        }
    }
}

#[async_trait]
impl GraphRepository for MemoryStore {
    async fn nodes_for_game(&self, game_id: Uuid) -> Result<Vec<Node>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .nodes
            .iter()
            .filter(|n| n.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn edges_for_game(&self, game_id: Uuid) -> Result<Vec<Edge>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .edges
            .iter()
            .filter(|e| e.game_id == game_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TeamRepository for MemoryStore {
    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_team_by_code(
        &self,
        game_id: Uuid,
        code: &str,
    ) -> Result<Option<Team>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .teams
            .iter()
            .find(|t| t.game_id == game_id && t.code == code)
            .cloned())
    }

    async fn teams_for_game(&self, game_id: Uuid) -> Result<Vec<Team>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .teams
            .iter()
            .filter(|t| t.game_id == game_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScanRepository for MemoryStore {
    // The backing Vec is append-ordered; filtering preserves that.
    async fn scans_for_team(&self, team_id: Uuid) -> Result<Vec<Scan>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .scans
            .iter()
            .filter(|s| s.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn scans_for_game(&self, game_id: Uuid) -> Result<Vec<Scan>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .scans
            .iter()
            .filter(|s| s.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn append_scan(&self, scan: NewScan) -> Result<Scan, HuntError> {
        let stored = Scan {
            id: Uuid::new_v4(),
            game_id: scan.game_id,
            team_id: scan.team_id,
            node_id: scan.node_id,
            scanned_at: scan.scanned_at,
            points_awarded: scan.points_awarded,
            client: scan.client,
        };
        self.inner.lock().unwrap().scans.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(&self, session: NewSession) -> Result<TeamSession, HuntError> {
        let stored = TeamSession {
            id: Uuid::new_v4(),
            team_id: session.team_id,
            token: session.token,
            expires_at: session.expires_at,
        };
        self.inner.lock().unwrap().sessions.push(stored.clone());
        Ok(stored)
    }

    async fn find_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<TeamSession>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn extend_session(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<(), HuntError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(session) = inner.sessions.iter_mut().find(|s| s.id == id) {
            session.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<bool, HuntError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.token != token);
        Ok(inner.sessions.len() < before)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, HuntError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.expires_at > now);
        Ok((before - inner.sessions.len()) as u64)
    }
}

#[async_trait]
impl HintRepository for MemoryStore {
    async fn unlocks_for_game(&self, game_id: Uuid) -> Result<Vec<HintUnlock>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .unlocks
            .iter()
            .filter(|u| u.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn unlocks_for_team(&self, team_id: Uuid) -> Result<Vec<HintUnlock>, HuntError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .unlocks
            .iter()
            .filter(|u| u.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn record_unlock(&self, unlock: NewHintUnlock) -> Result<HintUnlock, HuntError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner
            .unlocks
            .iter()
            .find(|u| u.team_id == unlock.team_id && u.node_id == unlock.node_id)
        {
            return Ok(existing.clone());
        }
        let stored = HintUnlock {
            id: Uuid::new_v4(),
            game_id: unlock.game_id,
            team_id: unlock.team_id,
            node_id: unlock.node_id,
            cost: unlock.cost,
            created_at: unlock.created_at,
        };
        inner.unlocks.push(stored.clone());
        Ok(stored)
    }
}
