use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::AppError;

/// `axum::Json` whose rejections use the JSON error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}
