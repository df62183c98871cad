//! Main entry point for the server.
//!
//! Parses the command line, starts the dispatcher actor and launches the HTTP
//! server with the WebSocket endpoint.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::info;

use grid_duel::config::server::ServerConfig;
use grid_duel::server::dispatcher::Dispatcher;
use grid_duel::server::matchmaking::queue::MatchQueue;
use grid_duel::server::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = ServerConfig::parse();

    let dispatcher = Dispatcher::new(MatchQueue::from_os_rng()).start();
    let state = web::Data::new(AppState::new(dispatcher));

    info!("[Server] Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(grid_duel::server::router::config)
    })
    .bind(config.bind_addr())?
    .run()
    .await
}
