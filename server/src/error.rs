use crate::api::ErrorResponse;
use crate::recipes::ValidationErrors;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Recipe not found")]
    NotFound,

    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    fields: errors.into_fields(),
                },
            ),
            AppError::MalformedPayload(_) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
            AppError::Store(e) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
