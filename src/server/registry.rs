//! Session registry: which active Session each client belongs to.
//!
//! Keeps both directions, client → session (to route moves) and
//! session → members (to evict everyone at once when a Session ends), so an
//! entry can never outlive the Session it points to. A client belongs to at
//! most one Session at a time.

use std::collections::HashMap;

use crate::game::error::GameError;
use crate::game::types::{ClientId, SessionId};

#[derive(Debug, Default)]
pub struct SessionRegistry {
    by_client: HashMap<ClientId, SessionId>,
    members: HashMap<SessionId, [ClientId; 2]>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new Session. Fails without changes if either member is
    /// already registered.
    pub fn register(&mut self, session_id: SessionId, members: [ClientId; 2]) -> Result<(), GameError> {
        if members.iter().any(|c| self.by_client.contains_key(c)) || self.members.contains_key(&session_id) {
            return Err(GameError::AlreadyInSession);
        }
        for client in members {
            self.by_client.insert(client, session_id);
        }
        self.members.insert(session_id, members);
        Ok(())
    }

    pub fn lookup(&self, client: ClientId) -> Option<SessionId> {
        self.by_client.get(&client).copied()
    }

    pub fn contains(&self, client: ClientId) -> bool {
        self.by_client.contains_key(&client)
    }

    pub fn session_count(&self) -> usize {
        self.members.len()
    }

    /// Removes a Session and all its members' entries. Returns the members.
    pub fn evict_session(&mut self, session_id: SessionId) -> Option<[ClientId; 2]> {
        let members = self.members.remove(&session_id)?;
        for client in members {
            if self.by_client.get(&client) == Some(&session_id) {
                self.by_client.remove(&client);
            }
        }
        Some(members)
    }
}
