//! Per-game standings cache.
//!
//! Absorbs bursts of concurrent reads during live events. Staleness is
//! bounded by the smaller of the TTL and the next write: every scoring
//! write invalidates the game's entry immediately.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use trailmark_core::model::LeaderboardEntry;
use uuid::Uuid;

#[derive(Debug)]
struct CachedBoard {
    computed_at: DateTime<Utc>,
    entries: Vec<LeaderboardEntry>,
}

#[derive(Debug)]
pub(crate) struct BoardCache {
    ttl: Duration,
    boards: Mutex<HashMap<Uuid, CachedBoard>>,
}

impl BoardCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            boards: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get(&self, game_id: Uuid, now: DateTime<Utc>) -> Option<Vec<LeaderboardEntry>> {
        let boards = self.boards.lock().unwrap();
        boards
            .get(&game_id)
            .filter(|board| now - board.computed_at < self.ttl)
            .map(|board| board.entries.clone())
    }

    pub(crate) fn put(&self, game_id: Uuid, now: DateTime<Utc>, entries: Vec<LeaderboardEntry>) {
        let mut boards = self.boards.lock().unwrap();
        boards.insert(
            game_id,
            CachedBoard {
                computed_at: now,
                entries,
            },
        );
    }

    pub(crate) fn invalidate(&self, game_id: Uuid) {
        self.boards.lock().unwrap().remove(&game_id);
    }
}
