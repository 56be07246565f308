//! Engine error types.
//!
//! Every fallible engine operation returns [`Result`]. Nothing in the engine
//! panics on external input; the HTTP-facing collaborator maps
//! [`ErrorKind`] to a status code.

use thiserror::Error;

use crate::core::{PlayerId, RoomId, SessionId};
use crate::session::Lifecycle;

/// Errors returned by the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Invalid or contradictory game configuration. Never partially applied.
    #[error("invalid value for {parameter}: {value}; allowed: {allowed}")]
    Configuration {
        parameter: &'static str,
        value: String,
        allowed: String,
    },

    /// A lifecycle rule was violated (e.g. double start).
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: Lifecycle,
        action: &'static str,
    },

    /// A turn-based action by someone other than the current player.
    #[error("not your turn; waiting on {expected}")]
    NotYourTurn { expected: PlayerId },

    /// The action is not allowed in the current state.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The pool could not supply every requested tile.
    #[error("pool exhausted: requested {requested} tiles, granted {granted}")]
    PoolExhausted { requested: usize, granted: usize },

    /// Unknown session or participant.
    #[error("not found: {0}")]
    NotFound(String),

    /// The game already reached a terminal state.
    #[error("game is {lifecycle}")]
    GameClosed { lifecycle: Lifecycle },

    /// The room already has a live game.
    #[error("{room} is already bound to {session}")]
    DuplicateRoomBinding { room: RoomId, session: SessionId },

    /// Tile accounting is corrupt. Indicates an engine bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Stable classification of [`EngineError`] for status-code mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    InvalidTransition,
    NotYourTurn,
    IllegalMove,
    PoolExhausted,
    NotFound,
    GameClosed,
    DuplicateRoomBinding,
    InvariantViolation,
}

impl EngineError {
    pub(crate) fn configuration(
        parameter: &'static str,
        value: impl ToString,
        allowed: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            parameter,
            value: value.to_string(),
            allowed: allowed.into(),
        }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalMove(reason.into())
    }

    pub(crate) fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::NotYourTurn { .. } => ErrorKind::NotYourTurn,
            Self::IllegalMove(_) => ErrorKind::IllegalMove,
            Self::PoolExhausted { .. } => ErrorKind::PoolExhausted,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::GameClosed { .. } => ErrorKind::GameClosed,
            Self::DuplicateRoomBinding { .. } => ErrorKind::DuplicateRoomBinding,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }

    /// True for errors that indicate a corrupt session rather than bad input.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

/// Engine result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
