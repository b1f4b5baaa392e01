//! One narrative report per graha.

use oxidize_pdf::Result;

use super::ReportContext;
use crate::astro::types::PlanetReport;
use crate::pdf::ReportWriter;

/// Story-style readings that frame the API predictions for `planet`.
pub fn themed_sections(planet: &str) -> Vec<(&'static str, String)> {
    let love = match planet {
        "Venus" | "Moon" | "Mars" => format!(
            "With {planet} colouring your chart, love is an adventure. You crave excitement and meaningful connection, and both intellectual and emotional richness define your bonds. Balance the pull towards passion with patience and understanding."
        ),
        _ => format!("In relationships, {planet} shapes how you express affection, care and compatibility."),
    };
    let travel = match planet {
        "Venus" | "Jupiter" | "Rahu" => format!(
            "Travel, exploration and new cultures energise you. {planet}'s placement points to growth through new experiences, whether physical journeys or inner ones."
        ),
        _ => "You gain perspective through experience, sometimes growing most through challenges or unfamiliar surroundings.".to_string(),
    };

    vec![
        ("Love & Relationships", love),
        (
            "Career & Learning",
            format!(
                "{planet} influences your ambitions and the way you learn. You are drawn to work and knowledge that resonate with its energy, and your professional growth follows dedication, insight and alignment with your inner strengths."
            ),
        ),
        ("Travel & Adventure", travel),
        (
            "Spirituality & Guidance",
            format!(
                "{planet} offers insight into your spiritual path, guiding your beliefs, intuition and inner growth. Moments of reflection are where its guidance is clearest."
            ),
        ),
    ]
}

fn section(writer: &mut ReportWriter, title: &str, body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    writer.subheading(title)?;
    writer.paragraph(body)
}

pub fn render_planet(writer: &mut ReportWriter, report: &PlanetReport) -> Result<()> {
    let planet = report.planet_considered.trim();

    writer.new_page()?;
    writer.heading(&format!("{planet} Report"))?;
    if !report.planet_location.trim().is_empty() {
        writer.label_value("Placed in House", &report.planet_location)?;
        writer.space(6.0);
    }

    for (title, body) in themed_sections(planet) {
        section(writer, title, &body)?;
    }
    section(writer, "General Prediction", &report.general_prediction)?;
    section(writer, "Personalised Prediction", &report.personalised_prediction)?;
    section(writer, "Planet Definition", &report.planet_definitions)?;
    section(writer, "Qualities (Short)", &report.qualities_short)?;
    section(writer, "Qualities (Long)", &report.qualities_long)?;
    section(writer, "Zodiac Influence", &report.planet_zodiac_prediction)?;

    if !report.character_keywords_positive.is_empty() {
        writer.subheading("Positive Traits")?;
        writer.bullets(&report.character_keywords_positive)?;
    }
    if !report.character_keywords_negative.is_empty() {
        writer.subheading("Negative Traits")?;
        writer.bullets(&report.character_keywords_negative)?;
    }
    section(writer, "Gayatri Mantra", &report.gayatri_mantra)
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    if ctx.astro.planet_reports.is_empty() {
        writer.new_page()?;
        writer.heading("PLANET REPORTS")?;
        return writer.paragraph("Planet reports were not available.");
    }
    for report in &ctx.astro.planet_reports {
        render_planet(writer, report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[test]
    fn test_themes_vary_by_planet() {
        let venus = themed_sections("Venus");
        assert!(venus[0].1.starts_with("With Venus colouring your chart"));
        assert!(venus[2].1.starts_with("Travel, exploration"));

        let saturn = themed_sections("Saturn");
        assert!(saturn[0].1.starts_with("In relationships, Saturn"));
        assert!(saturn[2].1.starts_with("You gain perspective"));
    }

    #[tokio::test]
    async fn test_one_page_per_planet_at_least() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 9);
        w.finish().unwrap();
    }

    #[test]
    fn test_sparse_report_renders() {
        let mut w = writer();
        let report = PlanetReport {
            planet_considered: "Ketu".to_string(),
            ..Default::default()
        };
        render_planet(&mut w, &report).unwrap();
        assert_eq!(w.page_count(), 1);
    }
}
