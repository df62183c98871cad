//! Matchmaking and authoritative session server for a two-player 3x3 grid game.

pub mod config;
pub mod game;
pub mod server;

#[cfg(test)]
mod tests;
