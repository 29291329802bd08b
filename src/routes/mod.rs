use std::{path::PathBuf, sync::Arc};

use axum::{
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::dispatch::{DeliveryChannel, ReconcilePolicy};
use crate::error::RegistryError;
use crate::store::PatientStore;

pub mod dashboard;
pub mod patients;
pub mod pregnancy;
pub mod reminders;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PatientStore>,
    pub channel: Arc<dyn DeliveryChannel>,
    pub reconcile: ReconcilePolicy,
}

/// Full application router. Unknown paths fall through to the static front
/// end when `public_dir` is given, then to a JSON 404.
pub fn app(state: AppState, public_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .merge(patients::routes(state.clone()))
        .merge(pregnancy::routes(state.clone()))
        .merge(dashboard::routes(state.clone()))
        .merge(reminders::routes(state))
        .route("/health", get(health));

    let router = match public_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).not_found_service(not_found.into_service()),
        ),
        None => router.fallback(not_found),
    };

    router.layer(CorsLayer::permissive())
}

/// Runs a store-backed operation off the async workers; the file store does
/// blocking I/O.
pub(crate) async fn blocking<T, F>(op: F) -> Result<T, RegistryError>
where
    F: FnOnce() -> Result<T, RegistryError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| RegistryError::Persistence(format!("store task failed: {e}")))?
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "message": "Maternal Health Reminder System is running",
        "timestamp": chrono::Utc::now(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint not found" })))
}
