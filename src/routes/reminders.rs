use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use crate::dispatch::dispatch;
use crate::error::RegistryError;
use crate::models::{DispatchStatus, SendReminderRequest};
use super::{blocking, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/send-reminder", post(send_reminder))
        .with_state(state)
}

async fn send_reminder(
    State(state): State<AppState>,
    body: Result<Json<SendReminderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), RegistryError> {
    let Json(body) = body?;
    let result = blocking(move || {
        dispatch(
            state.store.as_ref(),
            state.channel.as_ref(),
            state.reconcile,
            body,
            Utc::now(),
        )
    })
    .await?;

    let (status, message) = match result.status {
        DispatchStatus::Sent => (StatusCode::OK, "Reminder sent successfully"),
        DispatchStatus::Failed => (StatusCode::BAD_GATEWAY, "Failed to send reminder"),
    };

    let mut body = json!({ "message": message, "status": result.status });
    if let Some(week) = result.week {
        body["week"] = json!(week);
    }
    Ok((status, Json(body)))
}
