//! Round-robin start-node assignment.

use trailmark_core::model::{Node, Team};
use uuid::Uuid;

/// Picks the start node for a new team: the least-used start node wins,
/// ties broken by first-found order in `start_nodes`.
///
/// Pure function over current state, so concurrent team creation cannot
/// corrupt a counter; callers re-evaluate against the rows they just
/// read.
#[must_use]
pub fn assign_start_node(start_nodes: &[&Node], teams: &[Team]) -> Option<Uuid> {
    start_nodes
        .iter()
        .map(|node| {
            let load = teams
                .iter()
                .filter(|t| t.start_node_id == Some(node.id))
                .count();
            (node.id, load)
        })
        .min_by_key(|(_, load)| *load)
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use trailmark_test_support::fixtures;
    use uuid::Uuid;

    use super::assign_start_node;

    #[test]
    fn test_returns_none_without_start_nodes() {
        assert_eq!(assign_start_node(&[], &[]), None);
    }

    #[test]
    fn test_prefers_least_used_start_node() {
        let game_id = Uuid::new_v4();
        let a = fixtures::node(game_id, "a", 0);
        let b = fixtures::node(game_id, "b", 0);

        let mut t1 = fixtures::team(game_id, "RED", "Red");
        t1.start_node_id = Some(a.id);
        let mut t2 = fixtures::team(game_id, "BLUE", "Blue");
        t2.start_node_id = Some(a.id);
        let mut t3 = fixtures::team(game_id, "LIME", "Lime");
        t3.start_node_id = Some(b.id);

        let picked = assign_start_node(&[&a, &b], &[t1, t2, t3]);
        assert_eq!(picked, Some(b.id));
    }

    #[test]
    fn test_ties_break_by_first_found() {
        let game_id = Uuid::new_v4();
        let a = fixtures::node(game_id, "a", 0);
        let b = fixtures::node(game_id, "b", 0);

        let picked = assign_start_node(&[&a, &b], &[]);
        assert_eq!(picked, Some(a.id));
    }
}
