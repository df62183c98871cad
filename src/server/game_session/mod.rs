//! Game session module: one actor per paired Session.

pub mod server;
pub mod messages;

pub use server::GameSession;
