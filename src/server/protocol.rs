//! Wire protocol between clients and the server.
//!
//! Every WebSocket text frame carries one JSON envelope
//! `{"event": "<name>", "data": {...}}`. Inbound envelopes are decoded into
//! `ClientEvent`; outbound ones are `ServerEvent` wrapped in `Deliver`.

use actix::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::matchmaking::{DEFAULT_NAME, MAX_NAME_LEN};
use crate::game::error::GameError;
use crate::game::events::ServerEvent;
use crate::game::types::{MatchConfig, Symbol};
use crate::server::matchmaking::queue::MatchCriteria;

/// Actor message carrying one outbound event to a client connection.
#[derive(Message, Debug, Clone, PartialEq)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerEvent);

/// Client -> server event.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Hello { name: String },
    JoinQueue(JoinQueueRequest),
    LeaveQueue,
    PlaceMove { index: i64 },
    Ping,
}

/// Payload of `joinQueue`. Numbers are signed so that negative values reach
/// validation and are reported as `InvalidMatchConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinQueueRequest {
    pub stake: i64,
    pub best_of: i64,
    pub symbol_preference: Option<Symbol>,
}

impl JoinQueueRequest {
    pub fn criteria(&self) -> Result<MatchCriteria, GameError> {
        Ok(MatchCriteria {
            config: MatchConfig::new(self.best_of, self.stake)?,
            symbol_preference: self.symbol_preference,
        })
    }
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct HelloPayload {
    #[serde(default)]
    name: String,
}

/// Numeric fields are kept as raw JSON so that a wrong type is reported as a
/// bad match configuration rather than an undecodable frame.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinQueuePayload {
    #[serde(default)]
    stake: Value,
    #[serde(default)]
    best_of: Value,
    #[serde(default, alias = "symbolPref")]
    symbol_preference: Option<Symbol>,
}

impl JoinQueuePayload {
    fn into_request(self) -> Result<JoinQueueRequest, GameError> {
        let integer = |field: &str, value: &Value| {
            value
                .as_i64()
                .ok_or_else(|| GameError::InvalidMatchConfig(format!("{field} must be an integer, got {value}")))
        };
        Ok(JoinQueueRequest {
            stake: integer("stake", &self.stake)?,
            best_of: integer("bestOf", &self.best_of)?,
            symbol_preference: self.symbol_preference,
        })
    }
}

#[derive(Deserialize)]
struct PlaceMovePayload {
    #[serde(default)]
    index: Value,
}

impl PlaceMovePayload {
    fn index(&self) -> Result<i64, GameError> {
        self.index.as_i64().ok_or_else(|| GameError::InvalidMove(self.index.to_string()))
    }
}

fn payload<T: DeserializeOwned>(data: Value) -> Result<T, GameError> {
    serde_json::from_value(data).map_err(|e| GameError::MalformedEvent(e.to_string()))
}

impl ClientEvent {
    /// Decodes one text frame. Envelope and payload shape failures are
    /// `MalformedEvent`; a non-integer index or match number is reported as
    /// `InvalidMove` or `InvalidMatchConfig`.
    pub fn decode(text: &str) -> Result<Self, GameError> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|e| GameError::MalformedEvent(e.to_string()))?;
        match envelope.event.as_str() {
            "hello" => {
                let hello: HelloPayload = payload(envelope.data)?;
                Ok(ClientEvent::Hello { name: display_name(&hello.name) })
            }
            "joinQueue" => {
                let join: JoinQueuePayload = payload(envelope.data)?;
                Ok(ClientEvent::JoinQueue(join.into_request()?))
            }
            "leaveQueue" => Ok(ClientEvent::LeaveQueue),
            "placeMove" | "place" => {
                let place: PlaceMovePayload = payload(envelope.data)?;
                Ok(ClientEvent::PlaceMove { index: place.index()? })
            }
            "ping" => Ok(ClientEvent::Ping),
            other => Err(GameError::MalformedEvent(format!("unknown event '{other}'"))),
        }
    }
}

/// Trims and truncates a display name, falling back to the default.
pub fn display_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() { DEFAULT_NAME.to_string() } else { name }
}
