//! Trailmark — in-process event bus.
//!
//! Publish/subscribe keyed by (event kind, game slug), feeding the SSE
//! streams. The bus is an explicitly constructed, injected component —
//! there is no process-wide emitter.

pub mod bus;
pub mod event;
pub mod presence;

pub use bus::EventBus;
pub use event::{EventKind, GameEvent};
pub use presence::PresenceTracker;
