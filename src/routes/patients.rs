use axum::{
    Router,
    routing::get,
    extract::{rejection::JsonRejection, State, Path},
    Json,
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{json, Value};
use crate::error::RegistryError;
use crate::models::{NewPatient, Patient, PatientUpdate};
use crate::registry;
use super::{blocking, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/patients", get(list_patients).post(create_patient))
        .route(
            "/api/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .with_state(state)
}

async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Patient>>, RegistryError> {
    let patients = blocking(move || registry::list(state.store.as_ref())).await?;
    Ok(Json(patients))
}

async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), RegistryError> {
    let Json(body) = body?;
    let patient =
        blocking(move || registry::create(state.store.as_ref(), body, Utc::now())).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Patient registered successfully", "patient": patient })),
    ))
}

async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, RegistryError> {
    let patient = blocking(move || registry::get(state.store.as_ref(), &id)).await?;
    Ok(Json(patient))
}

async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PatientUpdate>, JsonRejection>,
) -> Result<Json<Value>, RegistryError> {
    let Json(body) = body?;
    let patient =
        blocking(move || registry::update(state.store.as_ref(), &id, body, Utc::now())).await?;
    Ok(Json(json!({ "message": "Patient updated successfully", "patient": patient })))
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    blocking(move || registry::delete(state.store.as_ref(), &id)).await?;
    Ok(Json(json!({ "message": "Patient deleted successfully" })))
}
