//! Server layer root module.
//!
//! Actors and plumbing around the pure game core:
//! - WebSocket connections and the wire protocol
//! - the dispatcher, which owns matchmaking and the session registry
//! - one game session actor per running match

pub mod state;
pub mod router;
pub mod protocol;
pub mod connection;
pub mod dispatcher;
pub mod registry;
pub mod flood_guard;
pub mod matchmaking;
pub mod game_session;
