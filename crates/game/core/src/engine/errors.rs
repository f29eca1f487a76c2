//! Errors surfaced by the turn engine.

use crate::error::{ErrorSeverity, GameError, Rejection};

/// Why a player action was not performed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TurnError {
    /// The action itself was impossible; nothing was charged.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("it is not the player's turn")]
    NotPlayersTurn,

    #[error("the player is dead")]
    PlayerDead,

    #[error("the encounter has no player")]
    NoPlayer,
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(rejection) => rejection.severity(),
            Self::NotPlayersTurn => ErrorSeverity::Validation,
            Self::PlayerDead => ErrorSeverity::Validation,
            Self::NoPlayer => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.error_code(),
            Self::NotPlayersTurn => "NOT_PLAYERS_TURN",
            Self::PlayerDead => "PLAYER_DEAD",
            Self::NoPlayer => "NO_PLAYER",
        }
    }
}
