use actix::prelude::*;

use crate::game::types::{ClientId, SessionId};

/// A member asks to place a mark. `index` is raw client input.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct ApplyMove {
    pub client: ClientId,
    pub index: i64,
}

/// Transport-level disconnect of a member.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct MemberDisconnected {
    pub client: ClientId,
}

/// Sent by a session actor to the dispatcher once its Session is terminal.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct SessionEnded {
    pub session_id: SessionId,
}
