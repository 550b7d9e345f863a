use std::sync::Arc;

use crate::model::{EntityStore, ModelManager, store::open_store};
use crate::utils::signal::shutdown_signal;
use crate::{error::AppResult, web::AppState};
use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod model;
pub mod progress;
pub mod utils;
pub mod web;

static APPLICATION_NAME: &str = "lectern";

/// Builds the app against the store named in the config file.
pub async fn build_server() -> AppResult<(AppState, Router)> {
    let use_local = cfg!(debug_assertions);
    let config = config::Config::get_or_init(use_local).await?;

    tracing::debug!(storage = config.app().storage_uri(), "opening store");
    let store = open_store(config.app().storage_uri()).await?;

    Ok(build_server_with_store(store, config.app().docs()))
}

pub fn build_server_with_store(store: Arc<dyn EntityStore>, docs: bool) -> (AppState, Router) {
    let mm = ModelManager::new(store);
    let state = AppState::new(mm);
    let app = web::routes::build_app(state.clone(), docs);
    (state, app)
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (_, app) = build_server().await?;
    let config = Config::get_or_init(cfg!(debug_assertions)).await?;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("axum is starting at: {}", config.host().bindto());
    let axum_handle = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    axum_handle.await?;
    tracing::info!("server stopped");
    Ok(())
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
