use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::astro::AstroError;

pub const REPORT_FAILURE_PREFIX: &str = "Error generating report: ";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Upstream(#[from] AstroError),

    #[error("Summary failed: {0}")]
    Llm(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<oxidize_pdf::PdfError> for AppError {
    fn from(err: oxidize_pdf::PdfError) -> Self {
        AppError::Render(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Upstream(_) | AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Every failure while assembling a report reaches the user through one
    /// message with a fixed prefix.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized | AppError::Jwt(_) => "Unauthorized".to_string(),
            AppError::InvalidCredentials => self.to_string(),
            AppError::Upstream(_) | AppError::Llm(_) | AppError::Render(_) | AppError::Internal(_) => {
                format!("{REPORT_FAILURE_PREFIX}{self}")
            }
        }
    }
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    span_context
        .is_valid()
        .then(|| span_context.trace_id().to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Report generation failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut body = json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        });
        if let Some(trace_id) = get_trace_id() {
            body["trace_id"] = json!(trace_id);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::Endpoint;

    #[test]
    fn test_validation_message_is_passed_through() {
        let error = AppError::Validation("Please fill in all fields: name".to_string());
        assert_eq!(error.public_message(), "Please fill in all fields: name");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_failure_gets_fixed_prefix() {
        let error = AppError::from(AstroError::Status {
            label: Endpoint::Panchang.label().to_string(),
            status: 500,
        });
        assert_eq!(
            error.public_message(),
            "Error generating report: Failed to fetch Panchang data: 500"
        );
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_render_and_llm_failures_share_the_prefix() {
        for error in [
            AppError::Render("bad font".to_string()),
            AppError::Llm("timeout".to_string()),
            AppError::Internal("boom".to_string()),
        ] {
            assert!(error.public_message().starts_with(REPORT_FAILURE_PREFIX));
        }
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidCredentials.public_message(),
            "Invalid username or password"
        );
    }
}
