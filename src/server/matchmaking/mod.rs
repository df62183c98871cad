/// Matchmaking module: waiting queue and pairing by match configuration.

pub mod queue;
