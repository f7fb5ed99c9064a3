//! Trailmark — Graph Store.
//!
//! Read-only, per-request snapshots of a game's authored graph, plus the
//! pure start-node assignment function used at team creation.

pub mod assign;
pub mod progress;
pub mod view;

pub use assign::assign_start_node;
pub use view::GraphView;
