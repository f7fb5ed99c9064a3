//! Connection-liveness tracking.
//!
//! Teams beat while their client is open; a team silent longer than the
//! timeout transitions to disconnected. Each transition publishes exactly
//! one `team-connection` event — a missed heartbeat never repeats it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use trailmark_core::clock::Clock;
use uuid::Uuid;

use crate::bus::EventBus;
use crate::event::GameEvent;

/// Default silence window before a team counts as disconnected.
pub const DEFAULT_TIMEOUT_SECS: i64 = 15;

#[derive(Debug)]
struct PresenceEntry {
    slug: String,
    last_beat: DateTime<Utc>,
    connected: bool,
}

/// Tracks per-team heartbeats and publishes liveness transitions.
pub struct PresenceTracker {
    timeout: Duration,
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<Uuid, PresenceEntry>>,
}

impl PresenceTracker {
    /// Creates a tracker with the default timeout.
    #[must_use]
    pub fn new(bus: Arc<EventBus>, clock: Arc<dyn Clock>) -> Self {
        Self::with_timeout(bus, clock, Duration::seconds(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a tracker with a custom timeout.
    #[must_use]
    pub fn with_timeout(bus: Arc<EventBus>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            timeout,
            bus,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a heartbeat for a team. A first beat, or a beat after a
    /// disconnection, publishes a connected transition.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn heartbeat(&self, team_id: Uuid, slug: &str) {
        let now = self.clock.now();
        let became_connected = {
            let mut entries = self.entries.lock().unwrap();
            let entry = entries.entry(team_id).or_insert_with(|| PresenceEntry {
                slug: slug.to_owned(),
                last_beat: now,
                connected: false,
            });
            entry.last_beat = now;
            entry.slug = slug.to_owned();
            let transition = !entry.connected;
            entry.connected = true;
            transition
        };
        if became_connected {
            self.bus.publish(
                slug,
                GameEvent::TeamConnection {
                    team_id,
                    connected: true,
                },
            );
        }
    }

    /// Flips teams silent longer than the timeout to disconnected,
    /// publishing one transition event each.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sweep(&self) {
        let now = self.clock.now();
        let lapsed: Vec<(Uuid, String)> = {
            let mut entries = self.entries.lock().unwrap();
            entries
                .iter_mut()
                .filter(|(_, e)| e.connected && now - e.last_beat > self.timeout)
                .map(|(team_id, e)| {
                    e.connected = false;
                    (*team_id, e.slug.clone())
                })
                .collect()
        };
        for (team_id, slug) in lapsed {
            tracing::debug!(%team_id, %slug, "team connection timed out");
            self.bus.publish(
                &slug,
                GameEvent::TeamConnection {
                    team_id,
                    connected: false,
                },
            );
        }
    }

    /// Whether a team is currently considered connected.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_connected(&self, team_id: Uuid) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(&team_id)
            .is_some_and(|e| e.connected)
    }
}
