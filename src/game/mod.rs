//! Pure game core: board, rules, Session state machine and the events it emits.
//! Nothing here knows about actors or sockets.

pub mod types;
pub mod error;
pub mod board;
pub mod rules;
pub mod events;
pub mod session;
