//! Error taxonomy for rejected client requests.
//!
//! Every variant is recoverable: it is reported to the offending client only
//! and leaves all Session state untouched.

use serde::Serialize;
use thiserror::Error;

/// Stable, machine-readable error code sent in `errorMsg.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidMove,
    CellOccupied,
    NotYourTurn,
    NotAMember,
    UnknownSession,
    InvalidMatchConfig,
    AlreadyQueued,
    AlreadyInSession,
    MalformedEvent,
    RateLimited,
}

/// A rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell index {0} is not on the board")]
    InvalidMove(String),

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("you are not a member of this session")]
    NotAMember,

    #[error("you are not in an active session")]
    UnknownSession,

    #[error("invalid match configuration: {0}")]
    InvalidMatchConfig(String),

    #[error("you are already waiting in the queue")]
    AlreadyQueued,

    #[error("you are already playing a match")]
    AlreadyInSession,

    #[error("could not decode event: {0}")]
    MalformedEvent(String),

    #[error("too many requests, slow down")]
    RateLimited,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidMove(_) => ErrorKind::InvalidMove,
            GameError::CellOccupied(_) => ErrorKind::CellOccupied,
            GameError::NotYourTurn => ErrorKind::NotYourTurn,
            GameError::NotAMember => ErrorKind::NotAMember,
            GameError::UnknownSession => ErrorKind::UnknownSession,
            GameError::InvalidMatchConfig(_) => ErrorKind::InvalidMatchConfig,
            GameError::AlreadyQueued => ErrorKind::AlreadyQueued,
            GameError::AlreadyInSession => ErrorKind::AlreadyInSession,
            GameError::MalformedEvent(_) => ErrorKind::MalformedEvent,
            GameError::RateLimited => ErrorKind::RateLimited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_as_variant_name() {
        let kind = GameError::CellOccupied(4).kind();
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""CellOccupied""#);
        assert_eq!(GameError::CellOccupied(4).to_string(), "cell 4 is already occupied");
    }
}
