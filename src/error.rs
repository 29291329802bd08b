use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid LMP date: {0}")]
    InvalidDate(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl RegistryError {
    pub fn patient_not_found() -> Self {
        RegistryError::NotFound("Patient".into())
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        RegistryError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Persistence(e.to_string())
    }
}

impl From<JsonRejection> for RegistryError {
    fn from(rejection: JsonRejection) -> Self {
        RegistryError::Validation(rejection.body_text())
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RegistryError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RegistryError::InvalidDate(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            RegistryError::Persistence(detail) => {
                tracing::error!("❌ Store error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to access patient data".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
