//! Per-request read-only snapshot of a game's graph.

use trailmark_core::error::HuntError;
use trailmark_core::model::{Edge, Node};
use trailmark_core::repository::GraphRepository;
use uuid::Uuid;

/// A snapshot of one game's nodes and edges, loaded once per request.
///
/// The engine never caches a `GraphView` across requests: authoring
/// changes and game-status transitions must be visible on the next scan.
/// Absence (unknown key, node with no outgoing edges) is an empty result,
/// not a failure — callers decide whether absence is an error.
#[derive(Debug)]
pub struct GraphView {
    game_id: Uuid,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphView {
    /// Builds a snapshot from already-loaded rows. Edges are ordered by
    /// (sort order, creation order) once, here.
    #[must_use]
    pub fn new(game_id: Uuid, nodes: Vec<Node>, mut edges: Vec<Edge>) -> Self {
        edges.sort_by(|a, b| {
            (a.sort_order, a.created_at, a.id).cmp(&(b.sort_order, b.created_at, b.id))
        });
        Self {
            game_id,
            nodes,
            edges,
        }
    }

    /// Loads the current snapshot of a game's graph.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    pub async fn load(repo: &dyn GraphRepository, game_id: Uuid) -> Result<Self, HuntError> {
        let nodes = repo.nodes_for_game(game_id).await?;
        let edges = repo.edges_for_game(game_id).await?;
        Ok(Self::new(game_id, nodes, edges))
    }

    /// The game this snapshot belongs to.
    #[must_use]
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// Looks up a node by its public key (the QR payload).
    #[must_use]
    pub fn node_by_key(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node_by_id(&self, id: Uuid) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes flagged as hunt entry points.
    #[must_use]
    pub fn start_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_start).collect()
    }

    /// Nodes flagged as hunt completion points.
    #[must_use]
    pub fn end_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_end).collect()
    }

    /// Outgoing edges of a node, ordered by (sort order, creation order).
    #[must_use]
    pub fn outgoing_edges(&self, node_id: Uuid) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| e.from_node == node_id)
            .collect()
    }

    /// Total node count of the game.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes of the game, in authored order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
