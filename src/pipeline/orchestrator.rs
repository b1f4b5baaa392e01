use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use opentelemetry::KeyValue;
use opentelemetry::trace::TraceContextExt;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::astro::AstroSource;
use crate::error::AppError;
use crate::llm::LlmClient;
use crate::models::BirthDetails;
use crate::pdf::ReportSettings;
use crate::telemetry::metrics::{REPORT_GENERATION_DURATION, REPORT_PAGES, REPORTS_FAILED};

use super::{render, retrieve, summarize};

/// A finished report ready for download.
#[derive(Debug)]
pub struct GeneratedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub duration: Duration,
}

/// Fetches every data category, optionally summarises it, then renders the
/// PDF. The first failing stage aborts the whole report.
pub async fn generate_full_report(
    source: &dyn AstroSource,
    llm: Option<&LlmClient>,
    settings: &ReportSettings,
    subject: &BirthDetails,
) -> Result<GeneratedReport, AppError> {
    generate_report_on(source, llm, settings, subject, Local::now().date_naive()).await
}

/// As [`generate_full_report`] with an explicit reference date for the
/// running-dasha markers.
#[tracing::instrument(
    name = "pipeline report",
    skip_all,
    fields(report.filename, report.summary, report.pages, report.duration_ms, trace_id)
)]
pub async fn generate_report_on(
    source: &dyn AstroSource,
    llm: Option<&LlmClient>,
    settings: &ReportSettings,
    subject: &BirthDetails,
    today: NaiveDate,
) -> Result<GeneratedReport, AppError> {
    let start = Instant::now();

    let span = tracing::Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();
    if span_context.is_valid() {
        span.record("trace_id", span_context.trace_id().to_string());
    }
    span.record("report.filename", subject.report_filename());
    span.record("report.summary", llm.is_some());

    let result = run_stages(source, llm, settings, subject, today).await;
    let duration = start.elapsed();

    match result {
        Ok((bytes, pages)) => {
            REPORT_GENERATION_DURATION.record(
                duration.as_secs_f64(),
                &[KeyValue::new("report.outcome", "success")],
            );
            REPORT_PAGES.record(pages as f64, &[]);

            span.record("report.pages", pages);
            span.record("report.duration_ms", duration.as_millis() as u64);
            tracing::info!(
                pages,
                bytes = bytes.len(),
                duration_ms = duration.as_millis() as u64,
                "Report generated"
            );

            Ok(GeneratedReport {
                filename: subject.report_filename(),
                bytes,
                pages,
                duration,
            })
        }
        Err(err) => {
            REPORT_GENERATION_DURATION.record(
                duration.as_secs_f64(),
                &[KeyValue::new("report.outcome", "failure")],
            );
            REPORTS_FAILED.add(1, &[KeyValue::new("error.type", failure_kind(&err))]);
            Err(err)
        }
    }
}

async fn run_stages(
    source: &dyn AstroSource,
    llm: Option<&LlmClient>,
    settings: &ReportSettings,
    subject: &BirthDetails,
    today: NaiveDate,
) -> Result<(Vec<u8>, usize), AppError> {
    // Stage 1: every astrology call, in order
    let bundle = retrieve::retrieve(source, &subject.query()).await?;

    // Stage 2: optional LLM summary
    let summary = match llm {
        Some(llm) => Some(summarize::summarize(llm, subject, &bundle).await?),
        None => None,
    };

    // Stage 3: layout
    let pdf = render::render_report(settings, subject, &bundle, summary.as_deref(), today)?;
    Ok((pdf.bytes, pdf.pages))
}

fn failure_kind(err: &AppError) -> &'static str {
    match err {
        AppError::Upstream(_) => "upstream",
        AppError::Llm(_) => "llm",
        AppError::Render(_) => "render",
        _ => "internal",
    }
}
