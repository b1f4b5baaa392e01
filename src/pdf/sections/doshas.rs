use oxidize_pdf::Result;

use super::{ReportContext, or_dash};
use crate::astro::types::DoshaFlag;
use crate::pdf::ReportWriter;
use crate::pipeline::retrieve::AstroBundle;

const INTRODUCTION: &str = "\
Doshas in a Kundali are the cosmic speed bumps of your journey. They are detours rather than dead ends: each marks an area where effort meets resistance, and each comes with remedies that turn the obstacle into growth.
Think of it as learning the terrain. The better you understand where the bumps are, the more gracefully you can move around them.";

/// One dosha as printed: a description plus optional effect and remedy lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoshaBlock {
    pub title: &'static str,
    pub description: String,
    pub effects: Vec<String>,
    pub remedies: Vec<String>,
}

/// Doshas in print order; those the API reports as absent are skipped.
pub fn dosha_blocks(astro: &AstroBundle) -> Vec<DoshaBlock> {
    let mut blocks = Vec::new();

    let mangal = &astro.mangal;
    if !mangal.is_absent() {
        let factors: Vec<&str> = mangal.factors.values().map(|f| f.trim()).collect();
        let mut description = format!(
            "Factors: {}.\nAstrological Insight: {} (Score: {}%).",
            factors.join("; "),
            mangal.bot_response.trim(),
            or_dash(&mangal.score),
        );
        if mangal.is_anshik {
            description.push_str("\nThis is a partial dosha (Anshik Manglik).");
        }
        blocks.push(DoshaBlock {
            title: "Mangal Dosh",
            description,
            effects: Vec::new(),
            remedies: mangal.cancellation.reasons.clone(),
        });
    }

    let kaalsarp = &astro.kaalsarp;
    if !kaalsarp.is_absent() {
        let mut description = format!("Astrological Insight: {}", kaalsarp.bot_response.trim());
        if !kaalsarp.dosha_type.trim().is_empty() {
            description.push_str(&format!("\nType: {}", kaalsarp.dosha_type.trim()));
        }
        blocks.push(DoshaBlock {
            title: "Kaal Sarp Dosh",
            description,
            effects: Vec::new(),
            remedies: kaalsarp.remedies.clone(),
        });
    }

    let pitra = &astro.pitra;
    if !pitra.is_absent() {
        blocks.push(DoshaBlock {
            title: "Pitra Dosh",
            description: format!("Astrological Insight: {}", pitra.bot_response.trim()),
            effects: pitra.effects.clone(),
            remedies: pitra.remedies.clone(),
        });
    }

    let papa = &astro.papasamaya;
    blocks.push(DoshaBlock {
        title: "Papa Samaya (Planetary Afflictions)",
        description: format!(
            "Planetary Afflictions:\n- Rahu {}\n- Sun {}\n- Saturn {}\n- Mars {}",
            or_dash(&papa.rahu_papa),
            or_dash(&papa.sun_papa),
            or_dash(&papa.saturn_papa),
            or_dash(&papa.mars_papa),
        ),
        effects: Vec::new(),
        remedies: Vec::new(),
    });

    let manglik = &astro.manglik;
    if !manglik.is_absent() {
        blocks.push(DoshaBlock {
            title: "Manglik Dosh",
            description: format!(
                "Factors: {}.\nAspects: {}.\nAstrological Insight: {} (Score: {}%).",
                manglik.factors.join(", "),
                manglik.aspects.join(", "),
                manglik.bot_response.trim(),
                or_dash(&manglik.score),
            ),
            effects: Vec::new(),
            remedies: Vec::new(),
        });
    }

    blocks
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    writer.new_page()?;
    writer.heading("ASTROLOGICAL DOSHAS: KARMIC BLOCKS & PLANETARY LESSONS")?;
    writer.subheading("Introduction")?;
    writer.paragraph(INTRODUCTION)?;

    for block in dosha_blocks(ctx.astro) {
        writer.space(4.0);
        writer.subheading(block.title)?;
        writer.paragraph(&block.description)?;
        if !block.effects.is_empty() {
            writer.subheading("Effects")?;
            writer.bullets(&block.effects)?;
        }
        if !block.remedies.is_empty() {
            writer.subheading("Remedies")?;
            writer.bullets(&block.remedies)?;
        }
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
    async fn test_absent_doshas_are_skipped() {
        let bundle = fixture_bundle().await;
        let titles: Vec<&str> = dosha_blocks(&bundle).iter().map(|b| b.title).collect();
        assert_eq!(
            titles,
            ["Mangal Dosh", "Pitra Dosh", "Papa Samaya (Planetary Afflictions)", "Manglik Dosh"]
        );
    }

    #[tokio::test]
    async fn test_mangal_description() {
        let bundle = fixture_bundle().await;
        let blocks = dosha_blocks(&bundle);
        let mangal = &blocks[0];
        assert_eq!(
            mangal.description,
            "Factors: Mars in 7th house; Mars aspects Moon.\n\
             Astrological Insight: Mars influences the seventh house moderately. (Score: 38%).\n\
             This is a partial dosha (Anshik Manglik)."
        );
        assert_eq!(mangal.remedies, ["Jupiter aspects Mars"]);
    }

    #[tokio::test]
    async fn test_unknown_presence_is_shown() {
        let mut bundle = fixture_bundle().await;
        bundle.kaalsarp.is_dosha_present = None;
        let titles: Vec<&str> = dosha_blocks(&bundle).iter().map(|b| b.title).collect();
        assert!(titles.contains(&"Kaal Sarp Dosh"));
    }

    #[tokio::test]
    async fn test_doshas_render() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 1);
        w.finish().unwrap();
    }
}
