/// Game session actor.
///
/// Owns exactly one `Session` and serializes every operation on it through
/// the actor mailbox. Events produced by the Session are delivered to the
/// members' connections; once the Session is terminal the dispatcher is told
/// first (so the registry is cleaned before clients can react), then the
/// final events go out and the actor stops.
use actix::prelude::*;
use std::collections::HashMap;
use log::{debug, info, warn};

use crate::game::error::GameError;
use crate::game::events::{Outbound, ServerEvent};
use crate::game::session::Session;
use crate::game::types::ClientId;
use crate::server::game_session::messages::{ApplyMove, MemberDisconnected, SessionEnded};
use crate::server::protocol::Deliver;

pub struct GameSession {
    session: Session,
    connections: HashMap<ClientId, Recipient<Deliver>>,
    dispatcher: Recipient<SessionEnded>,
}

impl GameSession {
    pub fn new(
        session: Session,
        connections: HashMap<ClientId, Recipient<Deliver>>,
        dispatcher: Recipient<SessionEnded>,
    ) -> Self {
        Self { session, connections, dispatcher }
    }

    fn deliver(&self, outbound: Vec<Outbound>) {
        for Outbound { to, event } in outbound {
            match self.connections.get(&to) {
                Some(addr) => addr.do_send(Deliver(event)),
                None => warn!("[GameSession] No connection for member {} in session {}", to, self.session.id()),
            }
        }
    }

    fn reject(&self, client: ClientId, err: &GameError) {
        warn!("[GameSession] Rejected request from {} in session {}: {}", client, self.session.id(), err);
        if let Some(addr) = self.connections.get(&client) {
            addr.do_send(Deliver(ServerEvent::error(err)));
        }
    }

    /// Delivers `outbound`, and shuts the actor down if the Session ended.
    fn publish(&mut self, outbound: Vec<Outbound>, ctx: &mut Context<Self>) {
        if self.session.is_terminal() {
            self.dispatcher.do_send(SessionEnded { session_id: self.session.id() });
            self.deliver(outbound);
            info!("[GameSession] Session {} closed in phase {:?}", self.session.id(), self.session.phase());
            ctx.stop();
        } else {
            self.deliver(outbound);
        }
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[GameSession] Session {} started: best_of={} stake={}",
            self.session.id(),
            self.session.config().best_of,
            self.session.config().stake
        );
        let outbound = self.session.begin();
        self.deliver(outbound);
    }
}

impl Handler<ApplyMove> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ApplyMove, ctx: &mut Context<Self>) -> Self::Result {
        let result = usize::try_from(msg.index)
            .map_err(|_| GameError::InvalidMove(msg.index.to_string()))
            .and_then(|index| self.session.apply_move(msg.client, index));
        match result {
            Ok(outbound) => self.publish(outbound, ctx),
            Err(err) => self.reject(msg.client, &err),
        }
    }
}

impl Handler<MemberDisconnected> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: MemberDisconnected, ctx: &mut Context<Self>) -> Self::Result {
        debug!("[GameSession] Member {} disconnected from session {}", msg.client, self.session.id());
        self.connections.remove(&msg.client);
        let outbound = self.session.member_disconnected(msg.client);
        self.publish(outbound, ctx);
    }
}
