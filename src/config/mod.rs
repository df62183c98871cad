/// Main configuration module.
///
/// Re-exports submodules for game, matchmaking, flood-guard and server configuration.
pub mod game;
pub mod matchmaking;
pub mod flood_guard;
pub mod server;
