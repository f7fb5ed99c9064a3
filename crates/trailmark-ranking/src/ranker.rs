//! Standings aggregation and ordering.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use trailmark_core::clock::Clock;
use trailmark_core::error::HuntError;
use trailmark_core::model::{LeaderboardEntry, RankingMode, Scan, Team};
use trailmark_core::repository::{
    GameRepository, GraphRepository, HintRepository, ScanRepository, TeamRepository,
};
use trailmark_graph::{GraphView, progress};
use uuid::Uuid;

use crate::cache::BoardCache;

/// Default cache TTL.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3;

/// Computes ranked standings for a game, with a short-lived cache.
pub struct LeaderboardService {
    games: Arc<dyn GameRepository>,
    graph: Arc<dyn GraphRepository>,
    teams: Arc<dyn TeamRepository>,
    scans: Arc<dyn ScanRepository>,
    hints: Arc<dyn HintRepository>,
    clock: Arc<dyn Clock>,
    cache: BoardCache,
}

impl LeaderboardService {
    /// Creates a service with the default cache TTL.
    #[must_use]
    pub fn new(
        games: Arc<dyn GameRepository>,
        graph: Arc<dyn GraphRepository>,
        teams: Arc<dyn TeamRepository>,
        scans: Arc<dyn ScanRepository>,
        hints: Arc<dyn HintRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_ttl(
            games,
            graph,
            teams,
            scans,
            hints,
            clock,
            Duration::seconds(DEFAULT_CACHE_TTL_SECS),
        )
    }

    /// Creates a service with a custom cache TTL.
    #[must_use]
    pub fn with_ttl(
        games: Arc<dyn GameRepository>,
        graph: Arc<dyn GraphRepository>,
        teams: Arc<dyn TeamRepository>,
        scans: Arc<dyn ScanRepository>,
        hints: Arc<dyn HintRepository>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            games,
            graph,
            teams,
            scans,
            hints,
            clock,
            cache: BoardCache::new(ttl),
        }
    }

    /// Drops the cached board for a game. Called after every successful
    /// scan or scoring mutation.
    pub fn invalidate(&self, game_id: Uuid) {
        self.cache.invalidate(game_id);
    }

    /// Returns the ranked standings for a game, serving a cached board
    /// when one is fresh enough.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::GameNotFound` for an unknown game and
    /// `HuntError::Infrastructure` if the store is unavailable.
    pub async fn leaderboard(&self, game_id: Uuid) -> Result<Vec<LeaderboardEntry>, HuntError> {
        let now = self.clock.now();
        if let Some(cached) = self.cache.get(game_id, now) {
            return Ok(cached);
        }

        let game = self
            .games
            .find_game(game_id)
            .await?
            .ok_or(HuntError::GameNotFound)?;
        let view = GraphView::load(self.graph.as_ref(), game_id).await?;
        let teams = self.teams.teams_for_game(game_id).await?;
        let scans = self.scans.scans_for_game(game_id).await?;
        let unlocks = self.hints.unlocks_for_game(game_id).await?;

        let mut scans_by_team: HashMap<Uuid, Vec<Scan>> = HashMap::new();
        for scan in scans {
            scans_by_team.entry(scan.team_id).or_default().push(scan);
        }
        let mut deductions: HashMap<Uuid, i64> = HashMap::new();
        for unlock in unlocks {
            *deductions.entry(unlock.team_id).or_default() += i64::from(unlock.cost);
        }

        let mut entries: Vec<LeaderboardEntry> = teams
            .iter()
            .map(|team| {
                let team_scans = scans_by_team.get(&team.id).map_or(&[][..], Vec::as_slice);
                build_entry(
                    team,
                    team_scans,
                    deductions.get(&team.id).copied().unwrap_or(0),
                    &view,
                )
            })
            .collect();

        sort_entries(&mut entries, game.settings.ranking_mode);
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }

        tracing::debug!(%game_id, teams = entries.len(), "standings recomputed");
        self.cache.put(game_id, now, entries.clone());
        Ok(entries)
    }
}

fn build_entry(
    team: &Team,
    scans: &[Scan],
    deduction: i64,
    view: &GraphView,
) -> LeaderboardEntry {
    let nodes_found = progress::distinct_nodes(scans).len();
    let awarded: i64 = scans.iter().map(|s| i64::from(s.points_awarded)).sum();
    let current_clue = progress::current_node_id(team, scans)
        .and_then(|id| view.node_by_id(id))
        .map(|n| n.title.clone());

    LeaderboardEntry {
        team_id: team.id,
        team_name: team.name.clone(),
        logo_url: team.logo_url.clone(),
        nodes_found: u32::try_from(nodes_found).unwrap_or(u32::MAX),
        total_points: awarded - deduction,
        current_clue,
        last_scan_at: scans.last().map(|s| s.scanned_at),
        finished: progress::is_hunt_complete(view, scans),
        rank: 0,
    }
}

/// Orders entries into a strict total order: finished before unfinished,
/// then the ranking mode's key, then earlier last-scan time (teams with
/// no scans sort last), then team id as the final anchor.
fn sort_entries(entries: &mut [LeaderboardEntry], mode: RankingMode) {
    entries.sort_by(|a, b| {
        b.finished
            .cmp(&a.finished)
            .then_with(|| match mode {
                RankingMode::Points => b.total_points.cmp(&a.total_points),
                RankingMode::Nodes => b.nodes_found.cmp(&a.nodes_found),
                RankingMode::Time => Ordering::Equal,
            })
            .then_with(|| time_tiebreak(a, b))
    });
}

fn time_tiebreak(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    let a_time = a.last_scan_at.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
    let b_time = b.last_scan_at.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
    a_time.cmp(&b_time).then_with(|| a.team_id.cmp(&b.team_id))
}
