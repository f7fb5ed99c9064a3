//! Progress derivation over the scan log.
//!
//! The scan sequence is the authoritative record: current position and
//! completion are always derived from it, never stored as mutable team
//! state.

use std::collections::HashSet;

use trailmark_core::model::{Scan, Team};
use uuid::Uuid;

use crate::view::GraphView;

/// The set of distinct nodes a team has reached.
#[must_use]
pub fn distinct_nodes(scans: &[Scan]) -> HashSet<Uuid> {
    scans.iter().map(|s| s.node_id).collect()
}

/// The node a team currently sits on: the most recent scan's node, or the
/// assigned start node before any scan exists.
#[must_use]
pub fn current_node_id(team: &Team, scans: &[Scan]) -> Option<Uuid> {
    scans.last().map_or(team.start_node_id, |s| Some(s.node_id))
}

/// Whether a team has completed the hunt: every node of the game scanned
/// AND the most recent scan landing on an end node.
#[must_use]
pub fn is_hunt_complete(view: &GraphView, scans: &[Scan]) -> bool {
    if view.node_count() == 0 {
        return false;
    }
    let Some(last) = scans.last() else {
        return false;
    };
    let last_is_end = view.node_by_id(last.node_id).is_some_and(|n| n.is_end);
    last_is_end && distinct_nodes(scans).len() == view.node_count()
}

/// The completion timestamp, if the team has finished.
#[must_use]
pub fn completion_time(
    view: &GraphView,
    scans: &[Scan],
) -> Option<chrono::DateTime<chrono::Utc>> {
    if is_hunt_complete(view, scans) {
        scans.last().map(|s| s.scanned_at)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use trailmark_core::model::{ClientMeta, Scan};
    use trailmark_test_support::fixtures;
    use uuid::Uuid;

    use super::*;

    fn scan_of(game_id: Uuid, team_id: Uuid, node_id: Uuid, offset_secs: i64) -> Scan {
        Scan {
            id: Uuid::new_v4(),
            game_id,
            team_id,
            node_id,
            scanned_at: fixtures::t0() + Duration::seconds(offset_secs),
            points_awarded: 0,
            client: ClientMeta::default(),
        }
    }

    #[test]
    fn test_current_node_is_start_before_any_scan() {
        let game_id = Uuid::new_v4();
        let start = fixtures::node(game_id, "s", 0);
        let mut team = fixtures::team(game_id, "RED", "Red");
        team.start_node_id = Some(start.id);

        assert_eq!(current_node_id(&team, &[]), Some(start.id));
    }

    #[test]
    fn test_current_node_follows_latest_scan() {
        let game_id = Uuid::new_v4();
        let a = fixtures::node(game_id, "a", 0);
        let b = fixtures::node(game_id, "b", 0);
        let team = fixtures::team(game_id, "RED", "Red");

        let scans = vec![
            scan_of(game_id, team.id, a.id, 0),
            scan_of(game_id, team.id, b.id, 60),
        ];
        assert_eq!(current_node_id(&team, &scans), Some(b.id));
    }

    #[test]
    fn test_complete_requires_all_nodes_and_end_landing() {
        let game_id = Uuid::new_v4();
        let a = fixtures::node(game_id, "a", 0);
        let mut end = fixtures::node(game_id, "end", 0);
        end.is_end = true;
        let team = fixtures::team(game_id, "RED", "Red");
        let view = GraphView::new(game_id, vec![a.clone(), end.clone()], vec![]);

        // All nodes but last scan not on the end node: not complete.
        let wrong_order = vec![
            scan_of(game_id, team.id, end.id, 0),
            scan_of(game_id, team.id, a.id, 60),
        ];
        assert!(!is_hunt_complete(&view, &wrong_order));

        // End landing but a node missing: not complete.
        let partial = vec![scan_of(game_id, team.id, end.id, 0)];
        assert!(!is_hunt_complete(&view, &partial));

        // Both conditions met.
        let done = vec![
            scan_of(game_id, team.id, a.id, 0),
            scan_of(game_id, team.id, end.id, 60),
        ];
        assert!(is_hunt_complete(&view, &done));
        assert_eq!(
            completion_time(&view, &done),
            Some(fixtures::t0() + Duration::seconds(60))
        );
    }

    #[test]
    fn test_empty_graph_is_never_complete() {
        let game_id = Uuid::new_v4();
        let view = GraphView::new(game_id, vec![], vec![]);
        assert!(!is_hunt_complete(&view, &[]));
    }
}
