//! Trailmark — game-progression engine.
//!
//! Turns a raw "team X scanned node Y" event into validated state
//! transitions, scoring, win detection, and events on the bus.

pub mod admin;
pub mod outcome;
pub mod scan;
pub mod validator;

pub use admin::GameAdmin;
pub use outcome::{
    HintOutcome, NodeReveal, NodeSummary, ScanOutcome, ScanRejection, TeamProgress, WinnerStatus,
};
pub use scan::ScanEngine;
