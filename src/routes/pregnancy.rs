use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::{blocking, AppState};
use crate::error::RegistryError;
use crate::models::{Milestone, PregnancyDetails};
use crate::pregnancy::{compute_pregnancy_details, parse_lmp};
use crate::registry;
use crate::schedule::DEFAULT_MILESTONES;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub lmp: Option<String>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsOfQuery {
    pub as_of: Option<NaiveDate>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/pregnancy", get(preview_pregnancy))
        .route("/api/milestones", get(list_milestones))
        .route("/api/patients/:id/pregnancy", get(patient_pregnancy))
        .with_state(state)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Registration form preview for an LMP that has not been saved yet.
async fn preview_pregnancy(
    Query(params): Query<PreviewQuery>,
) -> Result<Json<PregnancyDetails>, RegistryError> {
    let raw = params
        .lmp
        .ok_or_else(|| RegistryError::Validation("lmp is required".into()))?;
    let lmp = parse_lmp(&raw)?;

    Ok(Json(compute_pregnancy_details(lmp, params.as_of.unwrap_or_else(today))?))
}

async fn patient_pregnancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AsOfQuery>,
) -> Result<Json<PregnancyDetails>, RegistryError> {
    let patient = blocking(move || registry::get(state.store.as_ref(), &id)).await?;
    Ok(Json(compute_pregnancy_details(
        patient.lmp,
        params.as_of.unwrap_or_else(today),
    )?))
}

async fn list_milestones() -> Json<&'static [Milestone]> {
    Json(&DEFAULT_MILESTONES[..])
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::dispatch::ReconcilePolicy;
    use crate::routes::tests::{register, send, test_app};

    #[tokio::test]
    async fn preview_computes_details() {
        let (app, _tmp) = test_app(ReconcilePolicy::LogOnly);

        let (status, body) =
            send(&app, "GET", "/api/pregnancy?lmp=2024-01-01&asOf=2024-04-01", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dueDate"], "2024-10-07");
        assert_eq!(body["daysSinceLMP"], 91);
        assert_eq!(body["currentWeek"], 13);
        assert_eq!(body["trimester"], "Second");
    }

    #[tokio::test]
    async fn preview_rejects_bad_or_missing_lmp() {
        let (app, _tmp) = test_app(ReconcilePolicy::LogOnly);

        let (status, _) = send(&app, "GET", "/api/pregnancy?lmp=tomorrow", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, "GET", "/api/pregnancy", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preview_at_end_of_calendar_is_400() {
        let (app, _tmp) = test_app(ReconcilePolicy::LogOnly);
        let (status, body) = send(&app, "GET", "/api/pregnancy?lmp=%2B262142-12-31", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid LMP date"));
    }

    #[tokio::test]
    async fn patient_details_use_stored_lmp() {
        let (app, _tmp) = test_app(ReconcilePolicy::LogOnly);
        let patient = register(&app, "Amina", "2024-01-01").await;
        let id = patient["id"].as_str().unwrap();

        let uri = format!("/api/patients/{id}/pregnancy?asOf=2024-07-08");
        let (status, body) = send(&app, "GET", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentWeek"], 27);
        assert_eq!(body["trimester"], "Third");

        let (status, _) = send(&app, "GET", "/api/patients/missing/pregnancy", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn milestones_are_served_in_order() {
        let (app, _tmp) = test_app(ReconcilePolicy::LogOnly);
        let (status, body) = send(&app, "GET", "/api/milestones", None).await;

        assert_eq!(status, StatusCode::OK);
        let weeks: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["week"].as_i64().unwrap())
            .collect();
        assert_eq!(weeks, vec![12, 16, 20, 24, 28, 32, 36]);
    }
}
