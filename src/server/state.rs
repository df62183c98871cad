//! Application state shared by HTTP/WebSocket handlers.

use actix::Addr;

use crate::server::dispatcher::Dispatcher;

pub struct AppState {
    /// Address of the dispatcher actor (queue, registry, session routing).
    pub dispatcher: Addr<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Addr<Dispatcher>) -> Self {
        AppState { dispatcher }
    }
}
