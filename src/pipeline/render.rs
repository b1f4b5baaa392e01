use chrono::NaiveDate;
use tracing::Span;

use super::retrieve::AstroBundle;
use crate::error::AppError;
use crate::models::BirthDetails;
use crate::pdf::sections::{
    self, ReportContext, ashtakavarga, career, charts, cover, dasha, doshas, front, fundamentals,
    love, panchang, pillars, planets, sade_sati, shodashvarga, strength, summary,
};
use crate::pdf::{RenderedPdf, ReportSettings, ReportWriter};

/// Lays out every section in reading order and serialises the document.
#[tracing::instrument(
    name = "pipeline_stage render",
    skip_all,
    fields(pipeline.stage = "render", report.pages, report.bytes)
)]
pub fn render_report(
    settings: &ReportSettings,
    subject: &BirthDetails,
    astro: &AstroBundle,
    summary: Option<&str>,
    today: NaiveDate,
) -> Result<RenderedPdf, AppError> {
    let ctx = ReportContext {
        subject,
        astro,
        summary,
        today,
    };
    let mut writer = ReportWriter::new(&format!("Cosmic Code - {}", subject.name), &settings.brand);

    cover::render(&mut writer, &subject.name, settings.cover_jpeg.as_deref())?;
    front::disclaimer(&mut writer)?;
    front::author(&mut writer, &settings.brand.author)?;
    front::study_guide(&mut writer)?;
    front::table_of_contents(&mut writer, &sections::chapters(summary.is_some()))?;

    fundamentals::render(&mut writer, &ctx)?;
    panchang::grid(&mut writer, &ctx)?;
    panchang::narrative(&mut writer, &ctx)?;

    pillars::intro(&mut writer)?;
    pillars::moon(&mut writer, &ctx)?;
    pillars::ascendant(&mut writer, &ctx)?;
    pillars::nakshatra(&mut writer, &ctx)?;

    charts::render(&mut writer, &ctx)?;
    shodashvarga::render(&mut writer, &ctx)?;
    dasha::render(&mut writer, &ctx)?;
    ashtakavarga::render(&mut writer, &ctx)?;
    sade_sati::render(&mut writer, &ctx)?;
    doshas::render(&mut writer, &ctx)?;
    strength::render(&mut writer, &ctx)?;
    planets::render(&mut writer, &ctx)?;
    love::render(&mut writer, &ctx)?;
    career::render(&mut writer, &ctx)?;
    if summary.is_some() {
        summary::render(&mut writer, &ctx)?;
    }

    let rendered = writer.finish()?;

    let span = Span::current();
    span.record("report.pages", rendered.pages);
    span.record("report.bytes", rendered.bytes.len());

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::today;
    use crate::pdf::test_settings;
    use crate::pipeline::retrieve::fixture_bundle;

    #[tokio::test]
    async fn test_full_report_renders() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let pdf = render_report(&test_settings(), &subject, &bundle, None, today()).unwrap();

        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert!(pdf.pages > 30);
    }

    #[tokio::test]
    async fn test_summary_adds_a_page() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let settings = test_settings();

        let without = render_report(&settings, &subject, &bundle, None, today()).unwrap();
        let with = render_report(&settings, &subject, &bundle, Some("A short summary."), today())
            .unwrap();
        assert_eq!(with.pages, without.pages + 1);
    }
}
