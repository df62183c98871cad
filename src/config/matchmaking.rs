/// Matchmaking configuration constants.
///
/// This module defines parameters for the matchmaking queue, such as stake
/// limits and display name rules.

/// Highest stake a client may declare when joining the queue.
pub const MAX_STAKE: u64 = 1_000_000;

/// Maximum length (in characters) of a display name.
pub const MAX_NAME_LEN: usize = 18;

/// Display name used when a client provides none.
pub const DEFAULT_NAME: &str = "Guest";
