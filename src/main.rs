use dotenvy::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber;
use anyhow::Result;

mod config;
mod dashboard;
mod dispatch;
mod error;
mod models;
mod pregnancy;
mod registry;
mod routes;
mod schedule;
mod store;

use crate::{config::Config, dispatch::LogChannel, routes::AppState, store::JsonFileStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = JsonFileStore::open(&config.data_path)?;
    tracing::info!("📁 Patient data at {}", store.path().display());

    let state = AppState {
        store: Arc::new(store),
        channel: Arc::new(LogChannel),
        reconcile: config.reconcile,
    };
    tracing::info!("🔁 Dispatch reconciliation: {:?}", config.reconcile);

    let public_dir = config.public_dir.is_dir().then(|| config.public_dir.clone());
    if public_dir.is_none() {
        tracing::warn!("⚠️ No front end at {}, serving API only", config.public_dir.display());
    }

    let app = routes::app(state, public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at {}", addr);
    tracing::info!("📱 Maternal Health Reminder System is ready!");

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
