//! Shared application state.

use std::sync::{Arc, Mutex};

use trailmark_core::clock::Clock;
use trailmark_core::repository::{
    GameRepository, GraphRepository, HintRepository, ScanRepository, SessionRepository,
    TeamRepository,
};
use trailmark_core::rng::DeterministicRng;
use trailmark_engine::{GameAdmin, ScanEngine};
use trailmark_events::{EventBus, PresenceTracker};
use trailmark_ranking::LeaderboardService;
use trailmark_session::SessionRegistry;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Game lookups for slug resolution.
    pub games: Arc<dyn GameRepository>,
    /// The game-progression engine.
    pub engine: Arc<ScanEngine>,
    /// Administrative lifecycle transitions.
    pub admin: Arc<GameAdmin>,
    /// Session issuance and validation.
    pub sessions: Arc<SessionRegistry>,
    /// Leaderboard computation.
    pub ranking: Arc<LeaderboardService>,
    /// Event fan-out to SSE subscribers.
    pub bus: Arc<EventBus>,
    /// Connection-liveness tracking.
    pub presence: Arc<PresenceTracker>,
    /// The clock every component shares.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires the full engine stack over the given repositories.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        games: Arc<dyn GameRepository>,
        graph: Arc<dyn GraphRepository>,
        teams: Arc<dyn TeamRepository>,
        scans: Arc<dyn ScanRepository>,
        hints: Arc<dyn HintRepository>,
        session_rows: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng>>,
    ) -> Self {
        let bus = Arc::new(EventBus::default());
        let ranking = Arc::new(LeaderboardService::new(
            Arc::clone(&games),
            Arc::clone(&graph),
            Arc::clone(&teams),
            Arc::clone(&scans),
            Arc::clone(&hints),
            Arc::clone(&clock),
        ));
        let engine = Arc::new(ScanEngine::new(
            Arc::clone(&games),
            Arc::clone(&graph),
            Arc::clone(&teams),
            Arc::clone(&scans),
            Arc::clone(&hints),
            Arc::clone(&ranking),
            Arc::clone(&bus),
            Arc::clone(&clock),
        ));
        let admin = Arc::new(GameAdmin::new(
            Arc::clone(&games),
            Arc::clone(&graph),
            Arc::clone(&bus),
        ));
        let sessions = Arc::new(SessionRegistry::new(
            Arc::clone(&games),
            Arc::clone(&teams),
            session_rows,
            Arc::clone(&clock),
            rng,
            Arc::clone(&bus),
        ));
        let presence = Arc::new(PresenceTracker::new(Arc::clone(&bus), Arc::clone(&clock)));

        Self {
            games,
            engine,
            admin,
            sessions,
            ranking,
            bus,
            presence,
            clock,
        }
    }
}
