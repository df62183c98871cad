//! HTTP and WebSocket routing configuration.
//!
//! `/ws` upgrades to a client connection; `/stats` reports dispatcher counters.

use actix_web::{web, HttpResponse};
use log::error;

use crate::server::connection::ws_connect;
use crate::server::dispatcher::GetStats;
use crate::server::state::AppState;

async fn stats(data: web::Data<AppState>) -> HttpResponse {
    match data.dispatcher.send(GetStats).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            error!("[Router] Dispatcher unavailable: {}", e);
            HttpResponse::ServiceUnavailable().finish()
        }
    }
}

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_connect))
        .service(web::resource("/stats").route(web::get().to(stats)));
}
