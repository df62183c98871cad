//! End-to-end scenarios over the pure core: queue pairing feeding a Session,
//! driven without actors or sockets.

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::game::board::Board;
    use crate::game::error::GameError;
    use crate::game::events::{Outbound, RoundWinner, ServerEvent};
    use crate::game::session::Session;
    use crate::game::types::{Cell, ClientId, MatchConfig, Phase, Slot};
    use crate::server::matchmaking::queue::{Enqueued, MatchCriteria, MatchQueue};

    fn criteria(best_of: i64, stake: i64) -> MatchCriteria {
        MatchCriteria { config: MatchConfig::new(best_of, stake).unwrap(), symbol_preference: None }
    }

    /// Queues two fresh clients with the same criteria and starts their Session.
    fn paired_session(best_of: i64, stake: i64, seed: u64) -> (Session, [ClientId; 2], Vec<Outbound>) {
        let mut queue = MatchQueue::new(StdRng::seed_from_u64(seed));
        let (alice, bob) = (ClientId::new(), ClientId::new());
        assert!(matches!(queue.enqueue(alice, criteria(best_of, stake)), Ok(Enqueued::Waiting)));
        let Ok(Enqueued::Paired(pairing)) = queue.enqueue(bob, criteria(best_of, stake)) else {
            panic!("second client should pair");
        };
        assert!(queue.is_empty());
        let mut session = pairing.into_session(|c| if c == alice { "alice".into() } else { "bob".into() });
        let out = session.begin();
        (session, [alice, bob], out)
    }

    fn events_for(out: &[Outbound], to: ClientId) -> Vec<&ServerEvent> {
        out.iter().filter(|o| o.to == to).map(|o| &o.event).collect()
    }

    fn mover(session: &Session) -> ClientId {
        session.member(session.turn()).client
    }

    #[test]
    fn pairing_announces_complementary_seats_and_an_empty_board() {
        let (session, [alice, bob], out) = paired_session(1, 0, 11);

        let mut slots = Vec::new();
        let mut symbols = Vec::new();
        for client in [alice, bob] {
            let events = events_for(&out, client);
            assert_eq!(events.len(), 2);
            let ServerEvent::MatchFound { you_slot, you_symbol, opponent_symbol, session_id, pot, .. } = events[0]
            else {
                panic!("expected matchFound first, got {:?}", events[0]);
            };
            assert_eq!(*session_id, session.id());
            assert_eq!(*pot, 0);
            assert_ne!(you_symbol, opponent_symbol);
            slots.push(*you_slot);
            symbols.push(*you_symbol);

            let ServerEvent::RoundState { board, round_number, .. } = events[1] else {
                panic!("expected roundState second, got {:?}", events[1]);
            };
            assert_eq!(*round_number, 1);
            assert_eq!(*board, Board::new());
            assert!(board.cells().iter().all(|c| *c == Cell::Empty));
        }
        slots.sort_by_key(|s| s.index());
        assert_eq!(slots, vec![Slot::Zero, Slot::One]);
        assert_ne!(symbols[0], symbols[1]);
    }

    #[test]
    fn first_mover_takes_the_top_row_and_the_match() {
        let (mut session, _, _) = paired_session(1, 0, 12);
        let first = session.turn();

        let mut out = Vec::new();
        for index in [0, 3, 1, 4, 2] {
            out.extend(session.apply_move(mover(&session), index).unwrap());
        }

        let tail: Vec<_> = events_for(&out, session.member(Slot::Zero).client).into_iter().rev().take(2).collect();
        assert_eq!(tail[0], &ServerEvent::MatchOver { winner_slot: first, pot: 0 });
        match tail[1] {
            ServerEvent::RoundOver { winner_slot, line, .. } => {
                assert_eq!(*winner_slot, RoundWinner::Slot(first));
                assert_eq!(*line, Some([0, 1, 2]));
            }
            other => panic!("expected roundOver, got {other:?}"),
        }
        assert_eq!(session.phase(), Phase::MatchOver);
        assert_eq!(session.apply_move(mover(&session), 5), Err(GameError::UnknownSession));
    }

    #[test]
    fn full_board_without_line_is_a_draw_and_a_new_round() {
        let (mut session, [alice, _], _) = paired_session(3, 5, 13);

        let mut out = Vec::new();
        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            out.extend(session.apply_move(mover(&session), index).unwrap());
        }

        let events = events_for(&out, alice);
        let draw_at = events
            .iter()
            .position(|e| matches!(e, ServerEvent::RoundOver { winner_slot: RoundWinner::Draw, .. }))
            .expect("round should end in a draw");
        match events.get(draw_at + 1) {
            Some(ServerEvent::RoundState { board, round_number, .. }) => {
                assert_eq!(*round_number, 2);
                assert_eq!(*board, Board::new());
            }
            other => panic!("expected a fresh roundState, got {other:?}"),
        }
        assert_eq!(draw_at + 2, events.len());
        assert_eq!(session.phase(), Phase::InRound);
        assert_eq!(session.round_wins(), [0, 0]);
        assert_eq!(session.draws(), 1);
    }

    #[test]
    fn disconnect_mid_round_notifies_the_other_member_once() {
        let (mut session, [alice, bob], _) = paired_session(3, 0, 14);
        session.apply_move(mover(&session), 4).unwrap();

        let out = session.member_disconnected(alice);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, bob);
        assert_eq!(out[0].event, ServerEvent::OpponentDisconnected {});
        assert_eq!(session.phase(), Phase::Abandoned);

        // Nothing more comes out of an abandoned Session.
        assert!(session.member_disconnected(alice).is_empty());
        assert!(session.member_disconnected(bob).is_empty());
        assert_eq!(session.apply_move(bob, 0), Err(GameError::UnknownSession));
    }
}
