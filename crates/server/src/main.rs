mod api;
mod dto;
mod state;

use crate::state::AppState;
use axum::routing::get;
use bikeflow::prelude::*;
use std::{path::Path, sync::Arc, time::Instant};
use tracing::{error, info};

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 3 {
        error!("Usage: bikeflow-server <station_information.json> <trips.csv|trips.zip>");
        std::process::exit(1);
    }
    let stations_path = match Path::new(&args[1]).canonicalize() {
        Ok(path) => path,
        Err(err) => {
            error!("Could not find station information {}: {err}", args[1]);
            std::process::exit(1);
        }
    };
    // The trip file may not exist yet, it can be fetched later
    let trips_path = Path::new(&args[2]).to_path_buf();
    let state = Arc::new(AppState::new(stations_path, trips_path));

    if state.trips_path.exists() {
        info!("Loading data...");
        let now = Instant::now();
        match Repository::new().load_source(state.source()) {
            Ok(repository) => {
                info!(
                    "Loaded {} stations and {} trips in {:?}",
                    repository.stations.len(),
                    repository.trips.len(),
                    now.elapsed()
                );
                let _ = state.repository.write().await.replace(repository);
            }
            Err(err) => {
                error!("Failed to load data: {err}");
                std::process::exit(1);
            }
        }
    } else {
        info!("No trip data yet, use /fetch to download it");
    }

    let app = axum::Router::new()
        .route("/traffic", get(api::traffic))
        .route("/stations", get(api::stations))
        .route("/age", get(api::age))
        .route("/fetch", get(api::fetch_url))
        .with_state(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {PORT}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {PORT}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
