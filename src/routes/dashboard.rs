use axum::{extract::{State, Query}, Json, Router, routing::get};
use serde::Deserialize;
use crate::dashboard::summaries;
use crate::error::RegistryError;
use crate::models::PatientSummary;
use super::{blocking, AppState};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .with_state(state)
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Vec<PatientSummary>>, RegistryError> {
    let patients = blocking(move || state.store.list()).await?;
    Ok(Json(summaries(&patients, params.search.as_deref())))
}
