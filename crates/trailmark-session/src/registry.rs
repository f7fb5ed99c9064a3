//! Team session lifecycle.

use std::sync::{Arc, Mutex};

use chrono::Duration;
use trailmark_core::clock::Clock;
use trailmark_core::error::HuntError;
use trailmark_core::model::{GameStatus, NewSession, Team, TeamSession};
use trailmark_core::repository::{GameRepository, SessionRepository, TeamRepository};
use trailmark_core::rng::DeterministicRng;
use trailmark_events::{EventBus, GameEvent};

/// Default session validity window.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 48;

const TOKEN_LEN: usize = 48;
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A successful join: the resolved team and its fresh session.
#[derive(Debug, Clone)]
pub struct JoinGrant {
    /// The team the code resolved to.
    pub team: Team,
    /// The issued session.
    pub session: TeamSession,
}

/// Issues and validates per-team session tokens.
pub struct SessionRegistry {
    games: Arc<dyn GameRepository>,
    teams: Arc<dyn TeamRepository>,
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<dyn DeterministicRng>>,
    bus: Arc<EventBus>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Creates a registry with the default validity window.
    #[must_use]
    pub fn new(
        games: Arc<dyn GameRepository>,
        teams: Arc<dyn TeamRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng>>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            games,
            teams,
            sessions,
            clock,
            rng,
            bus,
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    /// Resolves a game by slug and a team by join code, and issues a
    /// session. The code is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// All refusals — unknown slug, game not active, unknown code — share
    /// one `Precondition` shape, so a caller cannot probe which part
    /// failed. `Infrastructure` passes through.
    pub async fn join(&self, game_slug: &str, team_code: &str) -> Result<JoinGrant, HuntError> {
        let Some(game) = self.games.find_game_by_slug(game_slug).await? else {
            tracing::debug!(slug = game_slug, "join refused: unknown game");
            return Err(join_refusal());
        };
        if game.status != GameStatus::Active {
            tracing::debug!(slug = game_slug, status = game.status.as_str(), "join refused: game not active");
            return Err(join_refusal());
        }
        let code = team_code.trim().to_uppercase();
        let Some(team) = self.teams.find_team_by_code(game.id, &code).await? else {
            tracing::debug!(slug = game_slug, "join refused: unknown team code");
            return Err(join_refusal());
        };

        let session = self
            .sessions
            .create_session(NewSession {
                team_id: team.id,
                token: self.generate_token(),
                expires_at: self.clock.now() + self.ttl,
            })
            .await?;

        tracing::info!(slug = game_slug, team = %team.name, "team joined");
        self.bus.publish(
            &game.slug,
            GameEvent::TeamJoined {
                team_id: team.id,
                team_name: team.name.clone(),
            },
        );
        Ok(JoinGrant { team, session })
    }

    /// Looks up a non-expired session and slides its expiry forward by
    /// the full validity window (renew-on-use), returning the team.
    ///
    /// # Errors
    ///
    /// Unknown and expired tokens both return `SessionInvalid` — the two
    /// cases are deliberately indistinguishable.
    pub async fn validate(&self, token: &str) -> Result<Team, HuntError> {
        let Some(session) = self.sessions.find_session_by_token(token).await? else {
            return Err(HuntError::SessionInvalid);
        };
        let now = self.clock.now();
        if session.expires_at <= now {
            return Err(HuntError::SessionInvalid);
        }
        self.sessions
            .extend_session(session.id, now + self.ttl)
            .await?;
        self.teams
            .find_team(session.team_id)
            .await?
            .ok_or(HuntError::SessionInvalid)
    }

    /// Deletes the session for a token. Logging out twice is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    pub async fn logout(&self, token: &str) -> Result<(), HuntError> {
        let existed = self.sessions.delete_session_by_token(token).await?;
        if existed {
            tracing::debug!("session logged out");
        }
        Ok(())
    }

    /// Removes expired session rows. Skipping a sweep is non-fatal; rows
    /// simply accumulate until the next one.
    ///
    /// # Errors
    ///
    /// Returns `HuntError::Infrastructure` if the store is unavailable.
    pub async fn sweep_expired(&self) -> Result<u64, HuntError> {
        let removed = self
            .sessions
            .delete_expired_sessions(self.clock.now())
            .await?;
        if removed > 0 {
            tracing::info!(removed, "swept expired sessions");
        }
        Ok(removed)
    }

    fn generate_token(&self) -> String {
        let mut rng = self.rng.lock().unwrap();
        let span = u32::try_from(TOKEN_ALPHABET.len() - 1).unwrap_or(u32::MAX);
        (0..TOKEN_LEN)
            .map(|_| {
                let index = rng.next_u32_range(0, span) as usize;
                char::from(TOKEN_ALPHABET[index])
            })
            .collect()
    }
}

fn join_refusal() -> HuntError {
    HuntError::precondition("invalid game or team code")
}
