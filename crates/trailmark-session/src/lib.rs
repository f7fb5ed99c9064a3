//! Trailmark — Session Registry.
//!
//! Issues, validates, extends, and expires per-team authentication
//! tokens.

pub mod registry;

pub use registry::{JoinGrant, SessionRegistry};
