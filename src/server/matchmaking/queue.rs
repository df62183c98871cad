//! Matchmaking queue.
//!
//! Waiting clients are grouped into buckets keyed by `(stake, bestOf)`. Within
//! a bucket entries keep arrival order and a new request pairs with the
//! oldest compatible entry (first-fit). The queue owns the random source used
//! for symbol and slot assignment, so a fixed seed replays pairings exactly.
//!
//! The queue itself is not synchronized; it is owned by the `Dispatcher`
//! actor, whose mailbox serializes every enqueue, dequeue and pairing.

use std::collections::{HashMap, VecDeque};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::game::error::GameError;
use crate::game::session::{Member, Session};
use crate::game::types::{ClientId, MatchConfig, SessionId, Slot, Symbol};

/// What a client asked for when joining the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCriteria {
    pub config: MatchConfig,
    pub symbol_preference: Option<Symbol>,
}

#[derive(Debug, Clone)]
struct Waiting {
    client: ClientId,
    symbol_preference: Option<Symbol>,
}

/// Two clients matched by the queue, with symbols and slots already decided.
pub struct Pairing {
    pub session_id: SessionId,
    /// `(client, symbol)` indexed by slot.
    pub seats: [(ClientId, Symbol); 2],
    pub config: MatchConfig,
    rng: StdRng,
}

impl Pairing {
    pub fn clients(&self) -> [ClientId; 2] {
        [self.seats[0].0, self.seats[1].0]
    }

    /// Builds the Session, resolving display names through `name_of`.
    pub fn into_session(self, name_of: impl Fn(ClientId) -> String) -> Session {
        let members = self.seats.map(|(client, symbol)| Member { client, name: name_of(client), symbol });
        Session::new(self.session_id, members, self.config, self.rng)
    }
}

/// Result of an enqueue request.
pub enum Enqueued {
    /// No compatible partner; the client now waits in its bucket.
    Waiting,
    Paired(Pairing),
}

pub struct MatchQueue {
    buckets: HashMap<MatchConfig, VecDeque<Waiting>>,
    /// Bucket of every waiting client.
    waiting: HashMap<ClientId, MatchConfig>,
    rng: StdRng,
}

impl MatchQueue {
    pub fn new(rng: StdRng) -> Self {
        Self { buckets: HashMap::new(), waiting: HashMap::new(), rng }
    }

    /// Queue seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn contains(&self, client: ClientId) -> bool {
        self.waiting.contains_key(&client)
    }

    /// Pairs `client` with the oldest waiting entry of the same bucket, or
    /// queues it when there is none.
    pub fn enqueue(&mut self, client: ClientId, criteria: MatchCriteria) -> Result<Enqueued, GameError> {
        if self.contains(client) {
            return Err(GameError::AlreadyQueued);
        }

        let bucket = self.buckets.entry(criteria.config).or_default();
        let Some(position) = bucket.iter().position(|w| w.client != client) else {
            bucket.push_back(Waiting { client, symbol_preference: criteria.symbol_preference });
            self.waiting.insert(client, criteria.config);
            debug!("[Matchmaking] Client {} queued in bucket {:?}", client, criteria.config);
            return Ok(Enqueued::Waiting);
        };

        let Some(partner) = bucket.remove(position) else {
            return Ok(Enqueued::Waiting);
        };
        if bucket.is_empty() {
            self.buckets.remove(&criteria.config);
        }
        self.waiting.remove(&partner.client);

        let (partner_symbol, requester_symbol) =
            assign_symbols(partner.symbol_preference, criteria.symbol_preference, &mut self.rng);
        let partner_seat = (partner.client, partner_symbol);
        let requester_seat = (client, requester_symbol);
        let seats = match Slot::random(&mut self.rng) {
            Slot::Zero => [partner_seat, requester_seat],
            Slot::One => [requester_seat, partner_seat],
        };

        let session_id = Builder::from_random_bytes(self.rng.random()).into_uuid();
        let rng = StdRng::from_rng(&mut self.rng);
        debug!("[Matchmaking] Paired {} with {} into session {}", partner.client, client, session_id);
        Ok(Enqueued::Paired(Pairing { session_id, seats, config: criteria.config, rng }))
    }

    /// Removes a waiting client. Returns whether it was queued.
    pub fn dequeue(&mut self, client: ClientId) -> bool {
        let Some(config) = self.waiting.remove(&client) else {
            return false;
        };
        if let Some(bucket) = self.buckets.get_mut(&config) {
            bucket.retain(|w| w.client != client);
            if bucket.is_empty() {
                self.buckets.remove(&config);
            }
        }
        debug!("[Matchmaking] Client {} left the queue", client);
        true
    }
}

/// Decides `(first, second)` symbols from the two declared preferences.
///
/// A lone or non-conflicting preference is honored; otherwise a coin flip
/// decides who gets the contested (or random) symbol and the other takes the
/// complement.
pub fn assign_symbols<R: Rng + ?Sized>(
    first: Option<Symbol>,
    second: Option<Symbol>,
    rng: &mut R,
) -> (Symbol, Symbol) {
    match (first, second) {
        (Some(a), Some(b)) if a != b => (a, b),
        (Some(a), None) => (a, a.complement()),
        (None, Some(b)) => (b.complement(), b),
        (Some(contested), Some(_)) => {
            if rng.random_bool(0.5) {
                (contested, contested.complement())
            } else {
                (contested.complement(), contested)
            }
        }
        (None, None) => {
            let symbol = Symbol::random(rng);
            (symbol, symbol.complement())
        }
    }
}
