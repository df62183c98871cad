//! Outbound events produced by the game core.
//!
//! The core never talks to a transport: each operation returns a list of
//! `Outbound` values and the caller delivers them.

use serde::{Serialize, Serializer};

use crate::game::board::Board;
use crate::game::error::{ErrorKind, GameError};
use crate::game::rules::Line;
use crate::game::types::{ClientId, SessionId, Slot, Symbol};

/// Winner of a round, serialized as the slot number or the string `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundWinner {
    Slot(Slot),
    Draw,
}

impl Serialize for RoundWinner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RoundWinner::Slot(slot) => serializer.serialize_u8(u8::from(*slot)),
            RoundWinner::Draw => serializer.serialize_str("draw"),
        }
    }
}

/// Server -> client event. Encoded as `{"event": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Queued {
        stake: u64,
        best_of: u32,
    },
    MatchFound {
        session_id: SessionId,
        you_slot: Slot,
        you_symbol: Symbol,
        opponent_name: String,
        opponent_symbol: Symbol,
        best_of: u32,
        pot: u64,
    },
    RoundState {
        board: Board,
        turn_slot: Slot,
        round_number: u32,
    },
    MoveApplied {
        index: usize,
        slot: Slot,
    },
    TurnChanged {
        turn_slot: Slot,
    },
    RoundOver {
        winner_slot: RoundWinner,
        round_wins: [u32; 2],
        wins_needed: u32,
        line: Option<Line>,
    },
    MatchOver {
        winner_slot: Slot,
        pot: u64,
    },
    OpponentDisconnected {},
    ErrorMsg {
        kind: ErrorKind,
        message: String,
    },
}

impl ServerEvent {
    pub fn error(err: &GameError) -> Self {
        ServerEvent::ErrorMsg { kind: err.kind(), message: err.to_string() }
    }
}

impl From<&GameError> for ServerEvent {
    fn from(err: &GameError) -> Self {
        ServerEvent::error(err)
    }
}

/// An event addressed to one client.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: ClientId,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: ClientId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}
