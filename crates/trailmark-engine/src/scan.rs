//! Scan registration: legality, scoring, completion, win detection.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Duration;
use trailmark_core::clock::Clock;
use trailmark_core::error::HuntError;
use trailmark_core::model::{
    ClientMeta, EdgeCondition, Game, GameStatus, NewHintUnlock, NewScan, Scan, Team,
};
use trailmark_core::repository::{
    GameRepository, GraphRepository, HintRepository, ScanRepository, TeamRepository,
};
use trailmark_events::{EventBus, GameEvent};
use trailmark_graph::{GraphView, progress};
use trailmark_ranking::LeaderboardService;
use uuid::Uuid;

use crate::outcome::{
    HintOutcome, NodeReveal, NodeSummary, ScanOutcome, ScanRejection, TeamProgress, WinnerStatus,
};
use crate::validator;

/// The game-progression engine.
///
/// All mutations to one team's scan history run inside that team's
/// critical section, which makes duplicate suppression and the
/// reachability check race-free. Teams never contend with each other.
pub struct ScanEngine {
    games: Arc<dyn GameRepository>,
    graph: Arc<dyn GraphRepository>,
    teams: Arc<dyn TeamRepository>,
    scans: Arc<dyn ScanRepository>,
    hints: Arc<dyn HintRepository>,
    ranking: Arc<LeaderboardService>,
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    team_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl ScanEngine {
    /// Wires the engine to its collaborators.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        games: Arc<dyn GameRepository>,
        graph: Arc<dyn GraphRepository>,
        teams: Arc<dyn TeamRepository>,
        scans: Arc<dyn ScanRepository>,
        hints: Arc<dyn HintRepository>,
        ranking: Arc<LeaderboardService>,
        bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            games,
            graph,
            teams,
            scans,
            hints,
            ranking,
            bus,
            clock,
            team_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a team's attempt to scan a node.
    ///
    /// Every refusal — unknown node, illegal transition, unsatisfied
    /// password gate — is a structured outcome the client renders
    /// inline. Once started, a scan runs to completion or reports a
    /// definitive failure; it is not interruptible.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` only, when the store fails.
    pub async fn record_scan(
        &self,
        team_id: Uuid,
        node_key: &str,
        password: Option<&str>,
        client: ClientMeta,
    ) -> Result<ScanOutcome, HuntError> {
        let Some(team) = self.teams.find_team(team_id).await? else {
            return Ok(ScanOutcome::rejected(ScanRejection::TeamNotFound));
        };
        let Some(game) = self.games.find_game(team.game_id).await? else {
            return Ok(ScanOutcome::rejected(ScanRejection::GameNotFound));
        };
        if game.status != GameStatus::Active {
            return Ok(ScanOutcome::rejected(ScanRejection::GameNotActive));
        }

        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;

        let view = GraphView::load(self.graph.as_ref(), game.id).await?;
        let Some(node) = view.node_by_key(node_key) else {
            return Ok(ScanOutcome::rejected(ScanRejection::NodeNotFound));
        };
        let history = self.scans.scans_for_team(team_id).await?;

        // Idempotent replay: a node scanned before never re-scores.
        if let Some(previous) = history.iter().find(|s| s.node_id == node.id) {
            let next_nodes = next_moves_from(&view, &game, node.id, &history);
            let complete = progress::is_hunt_complete(&view, &history);
            tracing::debug!(team = %team.name, node = %node.key, "duplicate scan replayed");
            return Ok(ScanOutcome::replayed(
                NodeReveal::from(node),
                previous.points_awarded,
                next_nodes,
                complete,
            ));
        }

        if !is_reachable(&view, &game, &team, &history, node.id, password) {
            return Ok(ScanOutcome::rejected(ScanRejection::IllegalTransition));
        }

        // The node's own gate is independent of edge conditions.
        if !node.password_matches(password) {
            return Ok(ScanOutcome::rejected(ScanRejection::PasswordRequired));
        }

        let now = self.clock.now();
        let points = award_points(&game, node.points, history.last(), now);
        let stored = self
            .scans
            .append_scan(NewScan {
                game_id: game.id,
                team_id,
                node_id: node.id,
                scanned_at: now,
                points_awarded: points,
                client,
            })
            .await?;

        let mut history = history;
        history.push(stored.clone());
        let complete = progress::is_hunt_complete(&view, &history);
        let next_nodes = next_moves_from(&view, &game, node.id, &history);

        tracing::info!(
            team = %team.name,
            node = %node.key,
            points,
            complete,
            "scan registered"
        );

        self.ranking.invalidate(game.id);
        let board = self.ranking.leaderboard(game.id).await?;
        self.bus.publish(
            &game.slug,
            GameEvent::Scan {
                team_id,
                team_name: team.name.clone(),
                node_id: node.id,
                node_title: node.title.clone(),
                points_awarded: points,
                scanned_at: stored.scanned_at,
            },
        );
        self.bus
            .publish(&game.slug, GameEvent::Leaderboard { entries: board });

        Ok(ScanOutcome::registered(
            NodeReveal::from(node),
            points,
            next_nodes,
            complete,
        ))
    }

    /// Derives a team's full progress from its scan log.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::TeamNotFound` / `GameNotFound` if either is
    /// absent, `Infrastructure` on store failure.
    pub async fn team_progress(&self, team_id: Uuid) -> Result<TeamProgress, HuntError> {
        let (team, game) =
            validator::require_team_and_game(self.teams.as_ref(), self.games.as_ref(), team_id)
                .await?;
        let view = GraphView::load(self.graph.as_ref(), game.id).await?;
        let history = self.scans.scans_for_team(team_id).await?;
        let unlocks = self.hints.unlocks_for_team(team_id).await?;

        let awarded: i64 = history.iter().map(|s| i64::from(s.points_awarded)).sum();
        let deducted: i64 = unlocks.iter().map(|u| i64::from(u.cost)).sum();
        let current_node = progress::current_node_id(&team, &history)
            .and_then(|id| view.node_by_id(id))
            .map(NodeReveal::from);
        let next_nodes = next_moves_for_team(&view, &game, &team, &history);
        let nodes_found = progress::distinct_nodes(&history).len();

        Ok(TeamProgress {
            next_clue: next_nodes.first().map(|n| n.title.clone()),
            next_nodes,
            current_node,
            total_points: awarded - deducted,
            nodes_found: u32::try_from(nodes_found).unwrap_or(u32::MAX),
            is_finished: progress::is_hunt_complete(&view, &history),
            team,
            scans: history,
        })
    }

    /// Whether this team completed the hunt before every other team.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::TeamNotFound` / `GameNotFound` if either is
    /// absent, `Infrastructure` on store failure.
    pub async fn check_winner(&self, team_id: Uuid) -> Result<WinnerStatus, HuntError> {
        let (team, game) =
            validator::require_team_and_game(self.teams.as_ref(), self.games.as_ref(), team_id)
                .await?;
        let view = GraphView::load(self.graph.as_ref(), game.id).await?;
        let all_scans = self.scans.scans_for_game(game.id).await?;

        let mut by_team: HashMap<Uuid, Vec<Scan>> = HashMap::new();
        for scan in all_scans {
            by_team.entry(scan.team_id).or_default().push(scan);
        }

        let empty: Vec<Scan> = Vec::new();
        let mine = by_team.get(&team.id).unwrap_or(&empty);
        let Some(my_completion) = progress::completion_time(&view, mine) else {
            return Ok(WinnerStatus {
                is_winner: false,
                completed_at: None,
            });
        };

        let beaten = by_team.iter().any(|(other_id, scans)| {
            *other_id != team.id
                && progress::completion_time(&view, scans)
                    .is_some_and(|t| (t, *other_id) < (my_completion, team.id))
        });

        Ok(WinnerStatus {
            is_winner: !beaten,
            completed_at: Some(my_completion),
        })
    }

    /// Reveals a node's hint for a team, recording the deduction once.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::TeamNotFound` / `GameNotFound` if either is
    /// absent, `Infrastructure` on store failure. Everything else is a
    /// structured outcome.
    pub async fn reveal_hint(
        &self,
        team_id: Uuid,
        node_key: &str,
    ) -> Result<HintOutcome, HuntError> {
        let (team, game) =
            validator::require_team_and_game(self.teams.as_ref(), self.games.as_ref(), team_id)
                .await?;
        if game.status != GameStatus::Active {
            return Ok(hint_refused(ScanRejection::GameNotActive.message()));
        }
        let view = GraphView::load(self.graph.as_ref(), game.id).await?;
        let Some(node) = view.node_by_key(node_key) else {
            return Ok(hint_refused(ScanRejection::NodeNotFound.message()));
        };
        let Some(hint) = node.hint.clone() else {
            return Ok(hint_refused("No hint exists for this checkpoint"));
        };

        let history = self.scans.scans_for_team(team_id).await?;
        let candidates = next_moves_for_team(&view, &game, &team, &history);
        if !candidates.iter().any(|n| n.id == node.id) {
            return Ok(hint_refused("That checkpoint is not among your next moves"));
        }

        // Repeat reveals are free: the original deduction stands alone.
        let unlocks = self.hints.unlocks_for_team(team_id).await?;
        if unlocks.iter().any(|u| u.node_id == node.id) {
            return Ok(HintOutcome {
                success: true,
                message: "Hint already revealed".to_owned(),
                hint: Some(hint),
                cost: 0,
            });
        }

        let cost = game.settings.hint_cost;
        self.hints
            .record_unlock(NewHintUnlock {
                game_id: game.id,
                team_id,
                node_id: node.id,
                cost,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(team = %team.name, node = %node.key, cost, "hint revealed");

        if cost != 0 {
            self.ranking.invalidate(game.id);
            let board = self.ranking.leaderboard(game.id).await?;
            self.bus
                .publish(&game.slug, GameEvent::Leaderboard { entries: board });
        }

        Ok(HintOutcome {
            success: true,
            message: "Hint revealed".to_owned(),
            hint: Some(hint),
            cost,
        })
    }

    fn team_lock(&self, team_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.team_locks.lock().unwrap();
        Arc::clone(locks.entry(team_id).or_default())
    }
}

fn hint_refused(message: &str) -> HintOutcome {
    HintOutcome {
        success: false,
        message: message.to_owned(),
        hint: None,
        cost: 0,
    }
}

/// Whether the scanned node is legal from the team's current position.
fn is_reachable(
    view: &GraphView,
    game: &Game,
    team: &Team,
    history: &[Scan],
    node_id: Uuid,
    password: Option<&str>,
) -> bool {
    if game.settings.random_mode {
        return true;
    }
    match history.last() {
        // The very first scan must be the assigned start node itself.
        None => team.start_node_id == Some(node_id),
        Some(last) => view
            .outgoing_edges(last.node_id)
            .iter()
            .any(|edge| edge.to_node == node_id && edge.condition.is_satisfied(password)),
    }
}

/// Points for landing on a node now, given the previous scan.
#[allow(clippy::cast_possible_truncation)]
fn award_points(
    game: &Game,
    node_points: i32,
    previous: Option<&Scan>,
    now: chrono::DateTime<chrono::Utc>,
) -> i32 {
    let Some(bonus) = game.settings.time_bonus else {
        return node_points;
    };
    let Some(previous) = previous else {
        // Nothing to measure the first scan against.
        return node_points;
    };
    if now - previous.scanned_at <= Duration::seconds(bonus.window_secs) {
        (f64::from(node_points) * bonus.multiplier).round() as i32
    } else {
        node_points
    }
}

/// Next-move summaries from a given node: targets of its `Always`
/// outgoing edges in edge order; in random mode, the remaining unscanned
/// pool. Password-gated edges stay undisclosed.
fn next_moves_from(
    view: &GraphView,
    game: &Game,
    from_node: Uuid,
    history: &[Scan],
) -> Vec<NodeSummary> {
    if game.settings.random_mode {
        return unscanned_pool(view, history);
    }
    let mut seen = HashSet::new();
    view.outgoing_edges(from_node)
        .iter()
        .filter(|edge| edge.condition == EdgeCondition::Always)
        .filter_map(|edge| view.node_by_id(edge.to_node))
        .filter(|node| seen.insert(node.id))
        .map(NodeSummary::from)
        .collect()
}

/// Next moves from the team's derived position; before the first scan
/// the only legal move is the assigned start node.
fn next_moves_for_team(
    view: &GraphView,
    game: &Game,
    team: &Team,
    history: &[Scan],
) -> Vec<NodeSummary> {
    if game.settings.random_mode {
        return unscanned_pool(view, history);
    }
    match history.last() {
        Some(last) => next_moves_from(view, game, last.node_id, history),
        None => team
            .start_node_id
            .and_then(|id| view.node_by_id(id))
            .map(NodeSummary::from)
            .into_iter()
            .collect(),
    }
}

fn unscanned_pool(view: &GraphView, history: &[Scan]) -> Vec<NodeSummary> {
    let scanned = progress::distinct_nodes(history);
    let mut pool: Vec<&trailmark_core::model::Node> = view
        .nodes()
        .iter()
        .filter(|n| !scanned.contains(&n.id))
        .collect();
    pool.sort_by(|a, b| (a.sort_order, a.created_at, a.id).cmp(&(b.sort_order, b.created_at, b.id)));
    pool.into_iter().map(NodeSummary::from).collect()
}

#[cfg(test)]
mod tests {
    use trailmark_core::model::{GameSettings, Node, TimeBonus};
    use trailmark_core::password;
    use trailmark_events::EventKind;
    use trailmark_test_support::{FixedClock, MemoryStore, fixtures};

    use super::*;

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        bus: Arc<EventBus>,
        engine: ScanEngine,
        game: Game,
        start: Node,
        b: Node,
        end: Node,
    }

    /// Seeds the demo hunt: S (start, password "ADVENTURE", 100) -> B
    /// (150) -> C (150) -> D (end, 300, no outgoing edges).
    fn demo_hunt(settings: GameSettings) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(fixtures::t0()));
        let bus = Arc::new(EventBus::default());

        let mut game = fixtures::active_game("demo");
        game.settings = settings;
        store.insert_game(game.clone());

        let mut start = fixtures::node(game.id, "s", 100);
        start.is_start = true;
        start.password_hash = Some(password::digest("ADVENTURE"));
        let mut b = fixtures::node(game.id, "b", 150);
        b.sort_order = 1;
        let mut c = fixtures::node(game.id, "c", 150);
        c.sort_order = 2;
        c.hint = Some("Look under the bridge".to_owned());
        let mut end = fixtures::node(game.id, "d", 300);
        end.sort_order = 3;
        end.is_end = true;
        for node in [&start, &b, &c, &end] {
            store.insert_node(node.clone());
        }
        store.insert_edge(fixtures::edge(game.id, start.id, b.id, 0));
        store.insert_edge(fixtures::edge(game.id, b.id, c.id, 0));
        store.insert_edge(fixtures::edge(game.id, c.id, end.id, 0));

        let ranking = Arc::new(LeaderboardService::new(
            Arc::clone(&store) as Arc<dyn GameRepository>,
            Arc::clone(&store) as Arc<dyn GraphRepository>,
            Arc::clone(&store) as Arc<dyn TeamRepository>,
            Arc::clone(&store) as Arc<dyn ScanRepository>,
            Arc::clone(&store) as Arc<dyn HintRepository>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let engine = ScanEngine::new(
            Arc::clone(&store) as Arc<dyn GameRepository>,
            Arc::clone(&store) as Arc<dyn GraphRepository>,
            Arc::clone(&store) as Arc<dyn TeamRepository>,
            Arc::clone(&store) as Arc<dyn ScanRepository>,
            Arc::clone(&store) as Arc<dyn HintRepository>,
            ranking,
            Arc::clone(&bus),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );

        Harness {
            store,
            clock,
            bus,
            engine,
            game,
            start,
            b,
            end,
        }
    }

    impl Harness {
        fn join_team(&self, code: &str, name: &str) -> Team {
            let mut team = fixtures::team(self.game.id, code, name);
            team.start_node_id = Some(self.start.id);
            self.store.insert_team(team.clone());
            team
        }

        /// Scans with the clock advanced one minute, so every scan gets
        /// a distinct timestamp.
        async fn scan(&self, team: &Team, key: &str, pw: Option<&str>) -> ScanOutcome {
            self.clock.advance(Duration::seconds(60));
            self.engine
                .record_scan(team.id, key, pw, ClientMeta::default())
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_demo_scenario_end_to_end() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        // Wrong start-node password: a re-prompt, not a hard failure.
        let wrong = h.scan(&alpha, "s", Some("WRONG")).await;
        assert!(!wrong.success);
        assert!(wrong.password_required);
        assert_eq!(wrong.rejection, Some(ScanRejection::PasswordRequired));
        assert_eq!(h.store.scan_count(), 0);

        // Correct password clears the gate for this scan.
        let first = h.scan(&alpha, "s", Some("ADVENTURE")).await;
        assert!(first.success);
        assert_eq!(first.points_awarded, 100);
        assert!(!first.is_game_complete);
        assert_eq!(first.next_nodes.len(), 1);
        assert_eq!(first.next_nodes[0].key, "b");

        // Skipping B is illegal.
        let skip = h.scan(&alpha, "c", None).await;
        assert!(!skip.success);
        assert_eq!(skip.rejection, Some(ScanRejection::IllegalTransition));

        // The legal path runs to completion.
        assert!(h.scan(&alpha, "b", None).await.success);
        assert!(h.scan(&alpha, "c", None).await.success);
        let last = h.scan(&alpha, "d", None).await;
        assert!(last.success);
        assert_eq!(last.points_awarded, 300);
        assert!(last.is_game_complete);
        assert!(last.next_nodes.is_empty());

        let winner = h.engine.check_winner(alpha.id).await.unwrap();
        assert!(winner.is_winner);
    }

    #[tokio::test]
    async fn test_duplicate_scan_is_idempotent() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        let first = h.scan(&alpha, "s", Some("ADVENTURE")).await;
        let mut rx = h.bus.subscribe("demo", EventKind::Scan);
        let replay = h.scan(&alpha, "s", None).await;

        assert!(replay.success);
        assert!(replay.duplicate);
        assert_eq!(replay.points_awarded, first.points_awarded);
        assert_eq!(h.store.scan_count(), 1);
        // No event, no new row: the replay changes nothing.
        assert!(rx.try_recv().is_err());

        let progress = h.engine.team_progress(alpha.id).await.unwrap();
        assert_eq!(progress.nodes_found, 1);
        assert_eq!(progress.total_points, 100);
    }

    #[tokio::test]
    async fn test_first_scan_must_be_assigned_start_node() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        let off_path = h.scan(&alpha, "b", None).await;
        assert_eq!(off_path.rejection, Some(ScanRejection::IllegalTransition));

        // A team with no assigned start node has no legal first move.
        let mut stray = fixtures::team(h.game.id, "STRAY", "Stray");
        stray.start_node_id = None;
        h.store.insert_team(stray.clone());
        let stuck = h.scan(&stray, "s", Some("ADVENTURE")).await;
        assert_eq!(stuck.rejection, Some(ScanRejection::IllegalTransition));
    }

    #[tokio::test]
    async fn test_unknown_key_and_inactive_game_are_rejected() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        let unknown = h.scan(&alpha, "nope", None).await;
        assert_eq!(unknown.rejection, Some(ScanRejection::NodeNotFound));

        h.store
            .update_game_status(h.game.id, GameStatus::Completed)
            .await
            .unwrap();
        let closed = h.scan(&alpha, "s", Some("ADVENTURE")).await;
        assert_eq!(closed.rejection, Some(ScanRejection::GameNotActive));
        assert_eq!(closed.message, "This hunt is not currently active");
    }

    #[tokio::test]
    async fn test_password_gated_edge_is_a_secret_passage() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        // A gated shortcut from B straight to the end node.
        let mut shortcut = fixtures::edge(h.game.id, h.b.id, h.end.id, 5);
        shortcut.condition = EdgeCondition::Password {
            hash: password::digest("tunnel"),
        };
        h.store.insert_edge(shortcut);

        h.scan(&alpha, "s", Some("ADVENTURE")).await;
        let at_b = h.scan(&alpha, "b", None).await;
        // The gated edge is not disclosed among next moves.
        assert_eq!(
            at_b.next_nodes.iter().map(|n| n.key.as_str()).collect::<Vec<_>>(),
            vec!["c"]
        );

        let barred = h.scan(&alpha, "d", None).await;
        assert_eq!(barred.rejection, Some(ScanRejection::IllegalTransition));

        let through = h.scan(&alpha, "d", Some("tunnel")).await;
        assert!(through.success);
        // Not complete: C was never scanned.
        assert!(!through.is_game_complete);
    }

    #[tokio::test]
    async fn test_random_mode_flattens_the_graph() {
        let h = demo_hunt(GameSettings {
            random_mode: true,
            ..GameSettings::default()
        });
        let alpha = h.join_team("ALPHA", "Alpha");

        // Any node first, in any order; the start node's own password
        // gate still applies when it is scanned.
        let first = h.scan(&alpha, "c", None).await;
        assert!(first.success);
        let pool: Vec<&str> = first.next_nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(pool, vec!["s", "b", "d"]);

        h.scan(&alpha, "d", None).await;
        h.scan(&alpha, "b", None).await;
        let gate = h.scan(&alpha, "s", None).await;
        assert!(gate.password_required);

        // Finished only when the last scan lands on an end node; here
        // the end node was scanned mid-way, so finishing on S does not
        // complete the hunt.
        let last = h.scan(&alpha, "s", Some("ADVENTURE")).await;
        assert!(last.success);
        assert!(!last.is_game_complete);
    }

    #[tokio::test]
    async fn test_time_bonus_applies_only_within_window() {
        let h = demo_hunt(GameSettings {
            time_bonus: Some(TimeBonus {
                window_secs: 120,
                multiplier: 1.5,
            }),
            ..GameSettings::default()
        });
        let alpha = h.join_team("ALPHA", "Alpha");

        // First scan: no previous scan, no bonus.
        let first = h.scan(&alpha, "s", Some("ADVENTURE")).await;
        assert_eq!(first.points_awarded, 100);

        // 60 s later: inside the window, 150 * 1.5 = 225.
        let quick = h.scan(&alpha, "b", None).await;
        assert_eq!(quick.points_awarded, 225);

        // Outside the window: base points.
        h.clock.advance(Duration::seconds(300));
        let slow = h.scan(&alpha, "c", None).await;
        assert_eq!(slow.points_awarded, 150);
    }

    #[tokio::test]
    async fn test_total_points_never_decrease_across_scans() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        let mut last_total = 0;
        for (key, pw) in [
            ("s", Some("ADVENTURE")),
            ("b", None),
            ("c", None),
            ("d", None),
        ] {
            h.scan(&alpha, key, pw).await;
            let progress = h.engine.team_progress(alpha.id).await.unwrap();
            assert!(progress.total_points >= last_total);
            last_total = progress.total_points;
        }
        assert_eq!(last_total, 700);
    }

    #[tokio::test]
    async fn test_second_finisher_is_not_the_winner() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");
        let bravo = h.join_team("BRAVO", "Bravo");

        for (key, pw) in [
            ("s", Some("ADVENTURE")),
            ("b", None),
            ("c", None),
            ("d", None),
        ] {
            h.scan(&alpha, key, pw).await;
        }
        for (key, pw) in [
            ("s", Some("ADVENTURE")),
            ("b", None),
            ("c", None),
            ("d", None),
        ] {
            h.scan(&bravo, key, pw).await;
        }

        assert!(h.engine.check_winner(alpha.id).await.unwrap().is_winner);
        assert!(!h.engine.check_winner(bravo.id).await.unwrap().is_winner);
    }

    #[tokio::test]
    async fn test_successful_scan_publishes_scan_then_leaderboard() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");
        let mut scans = h.bus.subscribe("demo", EventKind::Scan);
        let mut boards = h.bus.subscribe("demo", EventKind::Leaderboard);

        h.scan(&alpha, "s", Some("ADVENTURE")).await;

        assert!(matches!(
            scans.try_recv(),
            Ok(GameEvent::Scan {
                points_awarded: 100,
                ..
            })
        ));
        match boards.try_recv() {
            Ok(GameEvent::Leaderboard { entries }) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].total_points, 100);
            }
            other => panic!("expected leaderboard event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_leaderboard_reflects_scan_immediately_after_write() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        // Prime the cache, then scan within the TTL window.
        let before = h.engine.ranking.leaderboard(h.game.id).await.unwrap();
        assert_eq!(before[0].total_points, 0);
        h.scan(&alpha, "s", Some("ADVENTURE")).await;

        let after = h.engine.ranking.leaderboard(h.game.id).await.unwrap();
        assert_eq!(after[0].total_points, 100);
    }

    #[tokio::test]
    async fn test_progress_before_first_scan_points_at_start() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");

        let progress = h.engine.team_progress(alpha.id).await.unwrap();
        assert_eq!(progress.current_node.as_ref().map(|n| n.key.as_str()), Some("s"));
        assert_eq!(progress.next_clue.as_deref(), Some("Node s"));
        assert_eq!(progress.next_nodes.len(), 1);
        assert_eq!(progress.nodes_found, 0);
        assert!(!progress.is_finished);
    }

    #[tokio::test]
    async fn test_hint_deducts_once_and_repeat_reveals_are_free() {
        let h = demo_hunt(GameSettings {
            hint_cost: 25,
            ..GameSettings::default()
        });
        let alpha = h.join_team("ALPHA", "Alpha");
        h.scan(&alpha, "s", Some("ADVENTURE")).await;
        h.scan(&alpha, "b", None).await;

        // C is the next move and carries a hint.
        let revealed = h.engine.reveal_hint(alpha.id, "c").await.unwrap();
        assert!(revealed.success);
        assert_eq!(revealed.cost, 25);
        assert_eq!(revealed.hint.as_deref(), Some("Look under the bridge"));

        let again = h.engine.reveal_hint(alpha.id, "c").await.unwrap();
        assert!(again.success);
        assert_eq!(again.cost, 0);

        let progress = h.engine.team_progress(alpha.id).await.unwrap();
        assert_eq!(progress.total_points, 250 - 25);
    }

    #[tokio::test]
    async fn test_hint_refused_for_nodes_outside_next_moves() {
        let h = demo_hunt(GameSettings::default());
        let alpha = h.join_team("ALPHA", "Alpha");
        h.scan(&alpha, "s", Some("ADVENTURE")).await;

        // C is two moves away; its hint stays sealed.
        let refused = h.engine.reveal_hint(alpha.id, "c").await.unwrap();
        assert!(!refused.success);
        assert!(refused.hint.is_none());

        // B is next but has no hint authored.
        let missing = h.engine.reveal_hint(alpha.id, "b").await.unwrap();
        assert!(!missing.success);
    }

    #[tokio::test]
    async fn test_unknown_team_is_rejected_in_band() {
        let h = demo_hunt(GameSettings::default());
        let outcome = h
            .engine
            .record_scan(Uuid::new_v4(), "s", None, ClientMeta::default())
            .await
            .unwrap();
        assert_eq!(outcome.rejection, Some(ScanRejection::TeamNotFound));
    }
}
