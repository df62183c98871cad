//! Session state machine: one authoritative match between two clients.
//!
//! A `Session` owns the board, the turn pointer and the match score. Every
//! mutating operation returns the events it produced instead of sending
//! them, so the whole lifecycle can be driven without a transport:
//!
//! ```text
//! AwaitingOpponent --begin--> InRound --move--> InRound (turn flips)
//!                               |  \
//!                               |   win/draw --> RoundOver --> InRound (next round)
//!                               |   match won --> MatchOver
//!                               disconnect --> Abandoned
//! ```
//!
//! A rejected operation leaves the Session unchanged.

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::game::board::Board;
use crate::game::error::GameError;
use crate::game::events::{Outbound, RoundWinner, ServerEvent};
use crate::game::rules::{self, Outcome};
use crate::game::types::{ClientId, MatchConfig, Phase, SessionId, Slot, Symbol};

/// One participant of a Session. Its slot is its index in `Session::members`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub client: ClientId,
    pub name: String,
    pub symbol: Symbol,
}

pub struct Session {
    id: SessionId,
    members: [Member; 2],
    config: MatchConfig,
    board: Board,
    turn: Slot,
    round: u32,
    round_wins: [u32; 2],
    draws: u32,
    phase: Phase,
    rng: StdRng,
}

impl Session {
    /// Creates a paired Session in `AwaitingOpponent`. `members[0]` is slot 0.
    pub fn new(id: SessionId, members: [Member; 2], config: MatchConfig, rng: StdRng) -> Self {
        Self {
            id,
            members,
            config,
            board: Board::new(),
            turn: Slot::Zero,
            round: 0,
            round_wins: [0, 0],
            draws: 0,
            phase: Phase::AwaitingOpponent,
            rng,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn members(&self) -> &[Member; 2] {
        &self.members
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Slot {
        self.turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn round_wins(&self) -> [u32; 2] {
        self.round_wins
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn member(&self, slot: Slot) -> &Member {
        &self.members[slot.index()]
    }

    /// Slot of `client`, if it is a member.
    pub fn slot_of(&self, client: ClientId) -> Option<Slot> {
        Slot::BOTH.into_iter().find(|slot| self.member(*slot).client == client)
    }

    /// Announces the pairing to both members and starts round 1.
    pub fn begin(&mut self) -> Vec<Outbound> {
        if self.phase != Phase::AwaitingOpponent {
            warn!("[Session] begin called twice: session_id={} phase={:?}", self.id, self.phase);
            return Vec::new();
        }
        let mut out = Vec::with_capacity(4);
        for slot in Slot::BOTH {
            let me = self.member(slot);
            let opponent = self.member(slot.other());
            out.push(Outbound::new(
                me.client,
                ServerEvent::MatchFound {
                    session_id: self.id,
                    you_slot: slot,
                    you_symbol: me.symbol,
                    opponent_name: opponent.name.clone(),
                    opponent_symbol: opponent.symbol,
                    best_of: self.config.best_of,
                    pot: self.config.pot(),
                },
            ));
        }
        self.start_round(&mut out);
        out
    }

    /// Resets the board, re-rolls the first turn and broadcasts the snapshot.
    fn start_round(&mut self, out: &mut Vec<Outbound>) {
        if !matches!(self.phase, Phase::AwaitingOpponent | Phase::RoundOver) {
            warn!("[Session] start_round from invalid phase: session_id={} phase={:?}", self.id, self.phase);
            return;
        }
        self.board = Board::new();
        self.turn = Slot::random(&mut self.rng);
        self.round += 1;
        self.phase = Phase::InRound;
        debug!("[Session] Round {} started: session_id={} first_turn={:?}", self.round, self.id, self.turn);
        self.broadcast(
            out,
            ServerEvent::RoundState { board: self.board, turn_slot: self.turn, round_number: self.round },
        );
    }

    /// Validates and applies a move by `client` at `index`.
    pub fn apply_move(&mut self, client: ClientId, index: usize) -> Result<Vec<Outbound>, GameError> {
        let slot = self.slot_of(client).ok_or(GameError::NotAMember)?;
        if self.phase != Phase::InRound {
            return Err(GameError::UnknownSession);
        }
        if slot != self.turn {
            return Err(GameError::NotYourTurn);
        }
        let board = self.board.place(slot, index)?;

        let mut out = Vec::new();
        self.board = board;
        debug!("[Session] Move applied: session_id={} slot={:?} index={}", self.id, slot, index);
        self.broadcast(&mut out, ServerEvent::MoveApplied { index, slot });

        match rules::evaluate(&self.board) {
            Outcome::Win { slot: winner, line } => self.finish_round_won(winner, line, &mut out),
            Outcome::Draw => self.finish_round_drawn(&mut out),
            Outcome::Ongoing => {
                self.turn = self.turn.other();
                self.broadcast(&mut out, ServerEvent::TurnChanged { turn_slot: self.turn });
            }
        }
        Ok(out)
    }

    fn finish_round_won(&mut self, winner: Slot, line: rules::Line, out: &mut Vec<Outbound>) {
        self.round_wins[winner.index()] += 1;
        let wins_needed = self.config.wins_needed();
        info!(
            "[Session] Round {} won: session_id={} winner={:?} score={:?}",
            self.round, self.id, winner, self.round_wins
        );
        self.broadcast(
            out,
            ServerEvent::RoundOver {
                winner_slot: RoundWinner::Slot(winner),
                round_wins: self.round_wins,
                wins_needed,
                line: Some(line),
            },
        );

        if self.round_wins[winner.index()] >= wins_needed {
            self.phase = Phase::MatchOver;
            info!("[Session] Match over: session_id={} winner={:?}", self.id, winner);
            self.broadcast(out, ServerEvent::MatchOver { winner_slot: winner, pot: self.config.pot() });
        } else {
            self.phase = Phase::RoundOver;
            self.start_round(out);
        }
    }

    fn finish_round_drawn(&mut self, out: &mut Vec<Outbound>) {
        self.draws += 1;
        info!("[Session] Round {} drawn: session_id={}", self.round, self.id);
        self.broadcast(
            out,
            ServerEvent::RoundOver {
                winner_slot: RoundWinner::Draw,
                round_wins: self.round_wins,
                wins_needed: self.config.wins_needed(),
                line: None,
            },
        );
        self.phase = Phase::RoundOver;
        self.start_round(out);
    }

    /// Tears the Session down after `client` dropped. The other member is
    /// told once; later calls are no-ops.
    pub fn member_disconnected(&mut self, client: ClientId) -> Vec<Outbound> {
        let Some(slot) = self.slot_of(client) else {
            return Vec::new();
        };
        if self.is_terminal() {
            return Vec::new();
        }
        self.phase = Phase::Abandoned;
        info!("[Session] Abandoned: session_id={} disconnected={}", self.id, client);
        vec![Outbound::new(self.member(slot.other()).client, ServerEvent::OpponentDisconnected {})]
    }

    fn broadcast(&self, out: &mut Vec<Outbound>, event: ServerEvent) {
        out.push(Outbound::new(self.members[0].client, event.clone()));
        out.push(Outbound::new(self.members[1].client, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn session(best_of: i64, stake: i64, seed: u64) -> Session {
        let members = [
            Member { client: ClientId::new(), name: "alice".into(), symbol: Symbol::X },
            Member { client: ClientId::new(), name: "bob".into(), symbol: Symbol::O },
        ];
        let config = MatchConfig::new(best_of, stake).unwrap();
        Session::new(Uuid::new_v4(), members, config, StdRng::seed_from_u64(seed))
    }

    fn client(session: &Session, slot: Slot) -> ClientId {
        session.member(slot).client
    }

    /// Plays `cells` in order, each by whoever holds the turn.
    fn play(session: &mut Session, cells: &[usize]) -> Vec<Outbound> {
        let mut all = Vec::new();
        for &index in cells {
            let mover = client(session, session.turn());
            all.extend(session.apply_move(mover, index).unwrap());
        }
        all
    }

    /// Cells that give the first mover the top row and the second mover no line.
    const FIRST_MOVER_TOP_ROW: [usize; 5] = [0, 3, 1, 4, 2];
    /// Nine cells, alternating movers, that fill the board with no line.
    const DRAW_SEQUENCE: [usize; 9] = [0, 1, 2, 4, 3, 5, 7, 6, 8];

    fn events_for(out: &[Outbound], to: ClientId) -> Vec<&ServerEvent> {
        out.iter().filter(|o| o.to == to).map(|o| &o.event).collect()
    }

    #[test]
    fn begin_announces_mirrored_pairing_then_round_one() {
        let mut s = session(3, 10, 1);
        let out = s.begin();
        assert_eq!(s.phase(), Phase::InRound);
        assert_eq!(s.round(), 1);

        let alice = events_for(&out, client(&s, Slot::Zero));
        match alice[0] {
            ServerEvent::MatchFound { you_slot, you_symbol, opponent_name, opponent_symbol, pot, best_of, .. } => {
                assert_eq!(*you_slot, Slot::Zero);
                assert_eq!(*you_symbol, Symbol::X);
                assert_eq!(opponent_name, "bob");
                assert_eq!(*opponent_symbol, Symbol::O);
                assert_eq!(*pot, 20);
                assert_eq!(*best_of, 3);
            }
            other => panic!("expected MatchFound, got {other:?}"),
        }
        assert!(matches!(alice[1], ServerEvent::RoundState { round_number: 1, .. }));

        let bob = events_for(&out, client(&s, Slot::One));
        assert!(matches!(bob[0], ServerEvent::MatchFound { you_slot: Slot::One, .. }));
        assert!(s.begin().is_empty());
    }

    #[test]
    fn ongoing_move_flips_turn() {
        let mut s = session(1, 0, 2);
        s.begin();
        let first = s.turn();
        let out = s.apply_move(client(&s, first), 4).unwrap();
        assert_eq!(s.turn(), first.other());
        let events: Vec<_> = events_for(&out, client(&s, Slot::Zero));
        assert_eq!(
            events,
            vec![
                &ServerEvent::MoveApplied { index: 4, slot: first },
                &ServerEvent::TurnChanged { turn_slot: first.other() },
            ]
        );
    }

    #[test]
    fn rejected_moves_leave_state_unchanged() {
        let mut s = session(1, 0, 3);
        s.begin();
        let first = s.turn();
        s.apply_move(client(&s, first), 0).unwrap();
        let board = *s.board();

        // Replay by the same player after the turn flipped.
        assert_eq!(s.apply_move(client(&s, first), 0), Err(GameError::NotYourTurn));
        // The opponent targeting the taken cell.
        assert_eq!(s.apply_move(client(&s, first.other()), 0), Err(GameError::CellOccupied(0)));
        assert_eq!(s.apply_move(client(&s, first.other()), 9), Err(GameError::InvalidMove("9".into())));
        assert_eq!(s.apply_move(ClientId::new(), 5), Err(GameError::NotAMember));

        assert_eq!(*s.board(), board);
        assert_eq!(s.turn(), first.other());
        assert_eq!(s.phase(), Phase::InRound);
    }

    #[test]
    fn best_of_one_ends_on_first_win() {
        let mut s = session(1, 0, 4);
        s.begin();
        let winner = s.turn();
        let out = play(&mut s, &FIRST_MOVER_TOP_ROW);
        assert_eq!(s.phase(), Phase::MatchOver);
        assert_eq!(s.round_wins()[winner.index()], 1);

        let tail: Vec<_> = events_for(&out, client(&s, Slot::Zero)).into_iter().rev().take(2).collect();
        assert_eq!(tail[0], &ServerEvent::MatchOver { winner_slot: winner, pot: 0 });
        assert_eq!(
            tail[1],
            &ServerEvent::RoundOver {
                winner_slot: RoundWinner::Slot(winner),
                round_wins: s.round_wins(),
                wins_needed: 1,
                line: Some([0, 1, 2]),
            }
        );
        assert_eq!(s.apply_move(client(&s, winner), 5), Err(GameError::UnknownSession));
    }

    #[test]
    fn draw_starts_next_round_without_scoring() {
        let mut s = session(1, 0, 5);
        s.begin();
        let out = play(&mut s, &DRAW_SEQUENCE);

        assert_eq!(s.phase(), Phase::InRound);
        assert_eq!(s.round(), 2);
        assert_eq!(s.round_wins(), [0, 0]);
        assert_eq!(s.draws(), 1);
        assert!(s.board().cells().iter().all(|c| *c == crate::game::types::Cell::Empty));

        let events = events_for(&out, client(&s, Slot::One));
        let n = events.len();
        assert!(matches!(events[n - 2], ServerEvent::RoundOver { winner_slot: RoundWinner::Draw, .. }));
        assert!(matches!(events[n - 1], ServerEvent::RoundState { round_number: 2, .. }));
    }

    #[test]
    fn best_of_three_needs_two_wins() {
        let mut s = session(3, 5, 6);
        s.begin();
        let mut totals = [0u32; 2];
        let mut rounds = 0;
        while !s.is_terminal() {
            let winner = s.turn();
            play(&mut s, &FIRST_MOVER_TOP_ROW);
            totals[winner.index()] += 1;
            rounds += 1;
            assert_eq!(s.round_wins(), totals);
        }
        assert_eq!(s.phase(), Phase::MatchOver);
        assert_eq!(totals.iter().max(), Some(&2));
        assert_eq!(totals[0] + totals[1] + s.draws(), rounds);
        assert!(rounds == 2 || rounds == 3);
    }

    #[test]
    fn round_counts_add_up_with_draws() {
        let mut s = session(5, 0, 7);
        s.begin();
        play(&mut s, &DRAW_SEQUENCE);
        play(&mut s, &FIRST_MOVER_TOP_ROW);
        play(&mut s, &DRAW_SEQUENCE);
        let wins = s.round_wins();
        assert_eq!(wins[0] + wins[1] + s.draws(), s.round() - 1);
        assert_eq!(s.draws(), 2);
    }

    #[test]
    fn disconnect_notifies_the_other_member_once() {
        let mut s = session(1, 0, 8);
        s.begin();
        let leaver = client(&s, Slot::One);
        let stayer = client(&s, Slot::Zero);

        let out = s.member_disconnected(leaver);
        assert_eq!(out, vec![Outbound::new(stayer, ServerEvent::OpponentDisconnected {})]);
        assert_eq!(s.phase(), Phase::Abandoned);

        assert!(s.member_disconnected(stayer).is_empty());
        assert!(s.member_disconnected(leaver).is_empty());
        assert_eq!(s.apply_move(stayer, 0), Err(GameError::UnknownSession));
    }

    #[test]
    fn disconnect_after_match_over_is_silent() {
        let mut s = session(1, 0, 9);
        s.begin();
        play(&mut s, &FIRST_MOVER_TOP_ROW);
        assert!(s.member_disconnected(client(&s, Slot::Zero)).is_empty());
        assert_eq!(s.phase(), Phase::MatchOver);
    }

    #[test]
    fn first_turn_is_rerolled_each_round() {
        let mut s = session(9, 0, 10);
        s.begin();
        let mut seen = std::collections::HashSet::new();
        seen.insert(s.turn());
        for _ in 0..16 {
            play(&mut s, &DRAW_SEQUENCE);
            seen.insert(s.turn());
        }
        assert_eq!(seen.len(), 2);
    }
}
