//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Not-found and precondition variants are recoverable, caller-visible
/// results; `Infrastructure` is the only fatal class. Scan-legality
/// rejections never appear here — they travel as structured outcomes.
#[derive(Debug, Error)]
pub enum HuntError {
    /// No game matches the given id or slug.
    #[error("game not found")]
    GameNotFound,

    /// No team matches the given id or join code.
    #[error("team not found")]
    TeamNotFound,

    /// No node matches the given key within the game.
    #[error("node not found")]
    NodeNotFound,

    /// The session token is unknown or expired. Deliberately uniform:
    /// callers cannot distinguish the two cases.
    #[error("invalid or expired session")]
    SessionInvalid,

    /// A precondition failed. The message is surfaced verbatim to the
    /// caller's UI.
    #[error("{0}")]
    Precondition(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl HuntError {
    /// Builds a `Precondition` error from any message.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Builds an `Infrastructure` error from any message.
    #[must_use]
    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::Infrastructure(message.into())
    }
}
