use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::error::GameError;
use crate::config::game::MAX_BEST_OF;
use crate::config::matchmaking::MAX_STAKE;

/// Opaque, process-unique identity of a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a paired Session.
pub type SessionId = Uuid;

/// Index of a player inside a Session (0 or 1), independent of its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Slot {
    Zero,
    One,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::Zero, Slot::One];

    pub fn index(self) -> usize {
        match self {
            Slot::Zero => 0,
            Slot::One => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::Zero => Slot::One,
            Slot::One => Slot::Zero,
        }
    }

    /// Uniform random slot.
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Slot {
        if rng.random_bool(0.5) { Slot::Zero } else { Slot::One }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.index() as u8
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Slot::Zero),
            1 => Ok(Slot::One),
            other => Err(format!("invalid slot {other}")),
        }
    }
}

/// User-facing mark assigned to a slot for the duration of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn complement(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Symbol {
        if rng.random_bool(0.5) { Symbol::X } else { Symbol::O }
    }
}

/// A board cell. Serialized as `-1` when empty, otherwise the marking slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "i8")]
pub enum Cell {
    #[default]
    Empty,
    Mark(Slot),
}

impl From<Cell> for i8 {
    fn from(cell: Cell) -> i8 {
        match cell {
            Cell::Empty => -1,
            Cell::Mark(slot) => slot.index() as i8,
        }
    }
}

/// Settings both members agreed on when they were paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub best_of: u32,
    pub stake: u64,
}

impl MatchConfig {
    /// Validated constructor. `best_of` must be odd and within `1..=MAX_BEST_OF`;
    /// `stake` must be within `0..=MAX_STAKE`.
    pub fn new(best_of: i64, stake: i64) -> Result<Self, GameError> {
        if best_of < 1 || best_of > i64::from(MAX_BEST_OF) || best_of % 2 == 0 {
            return Err(GameError::InvalidMatchConfig(format!(
                "bestOf must be an odd number between 1 and {MAX_BEST_OF}, got {best_of}"
            )));
        }
        if stake < 0 || stake as u64 > MAX_STAKE {
            return Err(GameError::InvalidMatchConfig(format!(
                "stake must be between 0 and {MAX_STAKE}, got {stake}"
            )));
        }
        Ok(Self { best_of: best_of as u32, stake: stake as u64 })
    }

    /// Round wins required to take the match: `floor(bestOf / 2) + 1`.
    pub fn wins_needed(&self) -> u32 {
        self.best_of / 2 + 1
    }

    /// Amount awarded to the match winner.
    pub fn pot(&self) -> u64 {
        self.stake.saturating_mul(2)
    }
}

/// Lifecycle phase of a Session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    AwaitingOpponent,
    InRound,
    RoundOver,
    MatchOver,
    Abandoned,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::MatchOver | Phase::Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn wins_needed_is_strict_majority() {
        assert_eq!(MatchConfig::new(1, 0).unwrap().wins_needed(), 1);
        assert_eq!(MatchConfig::new(3, 0).unwrap().wins_needed(), 2);
        assert_eq!(MatchConfig::new(5, 0).unwrap().wins_needed(), 3);
    }

    #[test]
    fn even_or_out_of_range_best_of_is_rejected() {
        for best_of in [0, 2, 4, -1, 11] {
            assert!(matches!(MatchConfig::new(best_of, 0), Err(GameError::InvalidMatchConfig(_))));
        }
    }

    #[test]
    fn negative_or_huge_stake_is_rejected() {
        assert!(MatchConfig::new(1, -5).is_err());
        assert!(MatchConfig::new(1, MAX_STAKE as i64 + 1).is_err());
        assert_eq!(MatchConfig::new(3, 25).unwrap().pot(), 50);
    }

    #[test]
    fn cells_serialize_as_slot_numbers() {
        let cells = [Cell::Empty, Cell::Mark(Slot::Zero), Cell::Mark(Slot::One)];
        assert_eq!(serde_json::to_string(&cells).unwrap(), "[-1,0,1]");
    }

    #[test]
    fn slot_round_trips_through_u8() {
        assert_eq!(serde_json::to_string(&Slot::One).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Slot>("0").unwrap(), Slot::Zero);
        assert!(serde_json::from_str::<Slot>("2").is_err());
    }

    #[test]
    fn random_choices_are_reproducible_with_a_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(Slot::random(&mut a), Slot::random(&mut b));
            assert_eq!(Symbol::random(&mut a), Symbol::random(&mut b));
        }
    }
}
