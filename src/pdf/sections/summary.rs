use oxidize_pdf::Result;

use super::ReportContext;
use crate::pdf::ReportWriter;

/// Renders the generated summary. Blank lines separate paragraphs.
pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    writer.new_page()?;
    writer.heading("YOUR COSMIC SUMMARY")?;

    let Some(summary) = ctx.summary.map(str::trim).filter(|s| !s.is_empty()) else {
        return writer.paragraph("No summary was generated for this report.");
    };
    for block in summary.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        writer.paragraph(block)?;
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
    async fn test_summary_renders_with_and_without_text() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();

        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 1);

        let mut ctx = context(&subject, &bundle);
        ctx.summary = Some("Leo rising.\n\nVenus runs the current period.");
        render(&mut w, &ctx).unwrap();
        assert_eq!(w.page_count(), 2);
        w.finish().unwrap();
    }
}
