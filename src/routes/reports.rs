use axum::{
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::BirthForm;
use crate::pipeline::{GeneratedReport, generate_full_report};
use crate::routes::extract::AppJson;

/// Validates the birth form, builds the report and returns it as a PDF
/// download.
#[tracing::instrument(name = "report.create", skip_all, fields(user = %user))]
pub async fn create_report(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(form): AppJson<BirthForm>,
) -> AppResult<Response> {
    let subject = form.validate(state.config.default_timezone)?;

    let report = generate_full_report(
        state.astro.as_ref(),
        state.llm.as_deref(),
        &state.settings,
        &subject,
    )
    .await?;

    pdf_response(report)
}

fn pdf_response(report: GeneratedReport) -> AppResult<Response> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.filename
    ))
    .map_err(|e| AppError::Internal(format!("invalid filename header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::HeaderName::from_static("x-report-pages"),
                HeaderValue::from(report.pages),
            ),
            (
                header::HeaderName::from_static("x-report-duration-ms"),
                HeaderValue::from(report.duration.as_millis() as u64),
            ),
        ],
        report.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_pdf_response_headers() {
        let response = pdf_response(GeneratedReport {
            filename: "Cosmic_Report_11-03-1994.pdf".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
            pages: 36,
            duration: Duration::from_secs(2),
        })
        .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Cosmic_Report_11-03-1994.pdf\""
        );
        assert_eq!(headers["x-report-pages"], "36");
        assert_eq!(headers["x-report-duration-ms"], "2000");
    }
}
