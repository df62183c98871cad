/// WebSocket connection actor.
///
/// One actor per connected client. Text frames are rate limited, decoded
/// into `ClientEvent`s and forwarded to the dispatcher; `Deliver` messages
/// coming back are serialized and written to the socket.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::borrow::Cow;
use log::{debug, error, warn};

use crate::game::error::GameError;
use crate::game::events::ServerEvent;
use crate::game::types::ClientId;
use crate::server::dispatcher::{Connect, Disconnect, Dispatcher, Inbound};
use crate::server::flood_guard::FloodGuard;
use crate::server::protocol::{display_name, ClientEvent, Deliver};
use crate::server::state::AppState;

pub struct ClientConnection {
    client: ClientId,
    /// Name from the upgrade request. Later renames go through the dispatcher.
    name: String,
    dispatcher: Addr<Dispatcher>,
    flood: FloodGuard,
}

impl ClientConnection {
    pub fn new(name: String, dispatcher: Addr<Dispatcher>) -> Self {
        Self { client: ClientId::new(), name, dispatcher, flood: FloodGuard::new() }
    }

    fn send_event(&self, event: &ServerEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(event) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                error!("[Connection] Failed to serialize event for {}: {}", self.client, e);
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }

    fn on_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        if self.flood.record_request(&self.client.to_string()) {
            self.send_event(&ServerEvent::error(&GameError::RateLimited), ctx);
            ctx.close(Some(ws::CloseReason {
                code: ws::CloseCode::Policy,
                description: Some("Too many requests".into()),
            }));
            ctx.stop();
            return;
        }

        let event = match ClientEvent::decode(text) {
            Ok(event) => event,
            Err(err) => {
                debug!("[Connection] Rejected event from {}: {}", self.client, err);
                self.send_event(&ServerEvent::error(&err), ctx);
                return;
            }
        };
        if event != ClientEvent::Ping {
            self.dispatcher.do_send(Inbound { client: self.client, event });
        }
    }
}

impl Actor for ClientConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.dispatcher.do_send(Connect {
            client: self.client,
            name: self.name.clone(),
            addr: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.dispatcher.do_send(Disconnect { client: self.client });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClientConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => self.on_text(&text, ctx),
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Binary(_)) => {
                let err = GameError::MalformedEvent("binary frames are not supported".into());
                self.send_event(&ServerEvent::error(&err), ctx);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("[Connection] Protocol error from {}: {}", self.client, e);
                ctx.stop();
            }
        }
    }
}

impl Handler<Deliver> for ClientConnection {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) {
        self.send_event(&msg.0, ctx);
    }
}

/// Reads the optional `name` query parameter.
fn requested_name(query: &str) -> String {
    let raw = query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(key, _)| *key == "name")
        .map(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .unwrap_or_else(|_| Cow::Borrowed(""))
                .into_owned()
        })
        .unwrap_or_default();
    display_name(&raw)
}

/// WebSocket endpoint. Accepts an optional `name` query parameter.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let name = requested_name(req.query_string());
    ws::start(ClientConnection::new(name, data.dispatcher.clone()), &req, stream)
}
