/// Dispatcher actor.
///
/// Entry point for every client event. Owns the matchmaking queue, the
/// session registry and the address book of live connections and session
/// actors. Each inbound event maps to one queue or session operation; the
/// dispatcher itself never touches board state.
use actix::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use log::{debug, error, info, warn};

use crate::game::error::GameError;
use crate::game::events::ServerEvent;
use crate::game::types::{ClientId, SessionId};
use crate::server::game_session::GameSession;
use crate::server::game_session::messages::{ApplyMove, MemberDisconnected, SessionEnded};
use crate::server::matchmaking::queue::{Enqueued, MatchQueue, Pairing};
use crate::server::protocol::{ClientEvent, Deliver, JoinQueueRequest};
use crate::server::registry::SessionRegistry;

/// A client with an open connection.
struct ConnectedClient {
    name: String,
    addr: Recipient<Deliver>,
}

pub struct Dispatcher {
    clients: HashMap<ClientId, ConnectedClient>,
    queue: MatchQueue,
    registry: SessionRegistry,
    sessions: HashMap<SessionId, Addr<GameSession>>,
}

impl Dispatcher {
    pub fn new(queue: MatchQueue) -> Self {
        Self {
            clients: HashMap::new(),
            queue,
            registry: SessionRegistry::new(),
            sessions: HashMap::new(),
        }
    }

    fn send(&self, client: ClientId, event: ServerEvent) {
        if let Some(connected) = self.clients.get(&client) {
            connected.addr.do_send(Deliver(event));
        }
    }

    fn reject(&self, client: ClientId, err: GameError) {
        warn!("[Dispatcher] Rejected request from {}: {}", client, err);
        self.send(client, ServerEvent::error(&err));
    }

    fn name_of(&self, client: ClientId) -> String {
        self.clients
            .get(&client)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| crate::config::matchmaking::DEFAULT_NAME.to_string())
    }

    /// The live session actor for `client`. A registry entry without a known
    /// actor is a bookkeeping bug: it is logged and evicted.
    fn session_of(&mut self, client: ClientId) -> Option<Addr<GameSession>> {
        let session_id = self.registry.lookup(client)?;
        match self.sessions.get(&session_id) {
            Some(addr) if addr.connected() => Some(addr.clone()),
            Some(_) => {
                // Stopped, and its SessionEnded is still in our mailbox.
                debug!("[Dispatcher] Session {} already stopped, evicting", session_id);
                self.forget_session(session_id);
                None
            }
            None => {
                error!("[Dispatcher] Registry entry for {} points to missing session {}", client, session_id);
                self.forget_session(session_id);
                None
            }
        }
    }

    fn forget_session(&mut self, session_id: SessionId) {
        self.sessions.remove(&session_id);
        if let Some(members) = self.registry.evict_session(session_id) {
            debug!("[Dispatcher] Session {} evicted, members {:?} are free", session_id, members);
        }
    }

    fn join_queue(&mut self, client: ClientId, request: JoinQueueRequest, ctx: &mut Context<Self>) {
        if self.session_of(client).is_some() {
            return self.reject(client, GameError::AlreadyInSession);
        }
        let criteria = match request.criteria() {
            Ok(criteria) => criteria,
            Err(err) => return self.reject(client, err),
        };
        match self.queue.enqueue(client, criteria) {
            Ok(Enqueued::Waiting) => self.send(
                client,
                ServerEvent::Queued { stake: criteria.config.stake, best_of: criteria.config.best_of },
            ),
            Ok(Enqueued::Paired(pairing)) => self.launch_session(pairing, ctx),
            Err(err) => self.reject(client, err),
        }
    }

    /// Registers both members and starts the session actor, which announces
    /// the match and round 1.
    fn launch_session(&mut self, pairing: Pairing, ctx: &mut Context<Self>) {
        let clients = pairing.clients();
        let session = pairing.into_session(|c| self.name_of(c));
        let session_id = session.id();

        if let Err(err) = self.registry.register(session_id, clients) {
            error!("[Dispatcher] Could not register session {}: {}", session_id, err);
            return;
        }
        let connections = clients
            .iter()
            .filter_map(|c| self.clients.get(c).map(|connected| (*c, connected.addr.clone())))
            .collect();
        let addr = GameSession::new(session, connections, ctx.address().recipient()).start();
        self.sessions.insert(session_id, addr);
        info!("[Dispatcher] Session {} created for {} and {}", session_id, clients[0], clients[1]);
    }

    fn place_move(&mut self, client: ClientId, index: i64) {
        match self.session_of(client) {
            Some(addr) => match addr.try_send(ApplyMove { client, index }) {
                Ok(()) => {}
                Err(SendError::Full(msg)) => addr.do_send(msg),
                Err(SendError::Closed(_)) => self.reject(client, GameError::UnknownSession),
            },
            None => self.reject(client, GameError::UnknownSession),
        }
    }
}

impl Actor for Dispatcher {
    type Context = Context<Self>;
}

/// Message: a new connection was accepted.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub client: ClientId,
    pub name: String,
    pub addr: Recipient<Deliver>,
}

/// Message: a connection closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub client: ClientId,
}

/// Message: a decoded event from a client.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Inbound {
    pub client: ClientId,
    pub event: ClientEvent,
}

/// Message: snapshot of dispatcher counters.
#[derive(Message)]
#[rtype(result = "DispatcherStats")]
pub struct GetStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherStats {
    pub connected: usize,
    pub queued: usize,
    pub active_sessions: usize,
}

impl Handler<Connect> for Dispatcher {
    type Result = ();

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        info!("[Dispatcher] Client {} connected as '{}'", msg.client, msg.name);
        self.clients.insert(msg.client, ConnectedClient { name: msg.name, addr: msg.addr });
    }
}

impl Handler<Disconnect> for Dispatcher {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        info!("[Dispatcher] Client {} disconnected", msg.client);
        self.clients.remove(&msg.client);
        self.queue.dequeue(msg.client);
        if let Some(addr) = self.session_of(msg.client) {
            addr.do_send(MemberDisconnected { client: msg.client });
        }
    }
}

impl Handler<Inbound> for Dispatcher {
    type Result = ();

    fn handle(&mut self, msg: Inbound, ctx: &mut Self::Context) -> Self::Result {
        let Inbound { client, event } = msg;
        if !self.clients.contains_key(&client) {
            warn!("[Dispatcher] Event from unknown client {} ignored", client);
            return;
        }
        match event {
            ClientEvent::Hello { name } => {
                debug!("[Dispatcher] Client {} renamed to '{}'", client, name);
                if let Some(connected) = self.clients.get_mut(&client) {
                    connected.name = name;
                }
            }
            ClientEvent::JoinQueue(request) => self.join_queue(client, request, ctx),
            ClientEvent::LeaveQueue => {
                self.queue.dequeue(client);
            }
            ClientEvent::PlaceMove { index } => self.place_move(client, index),
            ClientEvent::Ping => {}
        }
    }
}

impl Handler<SessionEnded> for Dispatcher {
    type Result = ();

    fn handle(&mut self, msg: SessionEnded, _ctx: &mut Self::Context) -> Self::Result {
        self.forget_session(msg.session_id);
    }
}

impl Handler<GetStats> for Dispatcher {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _msg: GetStats, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(DispatcherStats {
            connected: self.clients.len(),
            queued: self.queue.len(),
            active_sessions: self.registry.session_count(),
        })
    }
}
