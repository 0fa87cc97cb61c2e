use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;

use chess_session_server::auth::TokenRegistry;
use chess_session_server::config::Args;
use chess_session_server::models::AppState;
use chess_session_server::routes::configure_routes;
use chess_session_server::store::{GameStore, MemoryGameStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();

    let identities = Arc::new(TokenRegistry::new());
    for player in &args.players {
        identities.register(&player.username, &player.token);
    }

    let store = Arc::new(MemoryGameStore::new());
    for (i, game) in args.games.iter().enumerate() {
        let name = format!("Game {}", i + 1);
        match store.create_game(&name, game.white.clone(), game.black.clone()) {
            Ok(game_id) => info!("Seeded game {} ({:?} vs {:?})", game_id, game.white, game.black),
            Err(e) => warn!("Could not seed {}: {}", name, e),
        }
    }

    // Create shared application state
    let app_state = web::Data::new(AppState::new(store, identities));

    let address = args.address();
    info!("Starting chess session server at ws://{}/ws", address);

    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(configure_routes))
        .bind(address)?
        .run()
        .await
}
