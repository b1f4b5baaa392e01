use opentelemetry::KeyValue;
use oxidize_pdf::Result;

use super::ReportContext;
use crate::pdf::ReportWriter;
use crate::pdf::chart::rasterize_svg;
use crate::pdf::theme::{self, GRID, PAGE_WIDTH};
use crate::telemetry::CHART_RENDER_FAILURES;

/// Rendered size on the page, in points.
const CHART_BOX: f64 = 250.0;
/// Raster resolution; twice the box for a crisp print.
const RASTER_PX: u32 = 500;
const SLOT_TOPS: [f64; 2] = [120.0, 435.0];

/// Lagna, Moon, Navamsa and Dashamsa charts, two per page.
pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let charts = &ctx.astro.charts;
    if charts.is_empty() {
        writer.new_page()?;
        writer.heading("YOUR BIRTH CHARTS")?;
        return writer.paragraph("No charts were returned for this birth data.");
    }

    for (page, pair) in charts.chunks(2).enumerate() {
        writer.new_page()?;
        if page == 0 {
            writer.heading("YOUR BIRTH CHARTS")?;
        }
        for (chart, top) in pair.iter().zip(SLOT_TOPS) {
            let x = (PAGE_WIDTH - CHART_BOX) / 2.0;
            writer.centered_at(top - 12.0, theme::bold(), 14.0, chart.title)?;

            match rasterize_svg(&chart.svg, RASTER_PX) {
                Ok(jpeg) => writer.jpeg(jpeg, x, top, CHART_BOX, CHART_BOX)?,
                Err(err) => {
                    tracing::warn!(chart.div = chart.div, error = %err, "Chart rasterisation failed");
                    CHART_RENDER_FAILURES.add(1, &[KeyValue::new("chart.div", chart.div)]);
                    writer.stroke_rect(x, top, CHART_BOX, CHART_BOX, GRID, 0.75);
                    writer.centered_at(
                        top + CHART_BOX / 2.0,
                        theme::italic(),
                        12.0,
                        "Chart could not be loaded",
                    )?;
                }
            }
        }
        writer.set_y(SLOT_TOPS[1] + CHART_BOX + 20.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[tokio::test]
    async fn test_two_charts_per_page() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 2);
        w.finish().unwrap();
    }

    #[tokio::test]
    async fn test_unrenderable_chart_gets_placeholder() {
        let mut bundle = fixture_bundle().await;
        bundle.charts[1].svg = "<svg".to_string();
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 2);
    }

    #[tokio::test]
    async fn test_no_charts_still_adds_a_page() {
        let mut bundle = fixture_bundle().await;
        bundle.charts.clear();
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 1);
    }
}
