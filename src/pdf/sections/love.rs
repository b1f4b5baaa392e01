//! Love & marriage chapter.

use oxidize_pdf::Result;

use super::ReportContext;
use crate::astro::types::{DoshaFlag, KaalsarpDosh, MangalDosh, ManglikDosh};
use crate::pdf::ReportWriter;
use crate::pdf::theme::{self, COVER_INK, COVER_PANEL, PAGE_HEIGHT, PAGE_WIDTH, color};

const DARAKARAKA: &str = "In Jaimini astrology the Darakaraka is the planet with the lowest degree in the birth chart, and it describes the nature of your future spouse. \"Dara\" means spouse or partner and \"Karaka\" means significator. Its sign, aspects and placement hint at your partner's personality, appearance and temperament, and at the dynamics of married life.";

const ROMANCE: &str = "\
Your birth chart holds the secrets of your romantic style.
For you love is a journey rather than a destination: spontaneous, exciting and full of discovery. You fall for someone who stimulates your mind, shares your appetite for adventure and is not afraid to bend a few rules along the way.
Routine relationships do not hold you for long. You need a partner who keeps things fresh, from late-night conversations to last-minute getaways, and who respects your need for freedom.
Be careful that excitement does not crowd out stability. The right partner matches your enthusiasm and stays when the thrill settles into something deeper.";

const MINDFUL: &str = "Your partner may sometimes seem withdrawn when you want to share experiences with the wider world. A private nature can clash with a wish for recognition, and quiet service can look like criticism of a more visible way of living. Naming these differences early keeps them from hardening into distance.";

const EVOLUTION: &str = "Your relationship deepens as outer recognition balances with inner meaning. Early respect grows into appreciation of how you complement each other, and your home becomes both a place of achievement and a sanctuary. Over the years you build a partnership that serves a purpose larger than either of you.";

const HARMONY: &str = "\
Offer food or clothing to those in need on Thursdays, quietly and without announcing it. Light a ghee lamp on Thursday evenings and sit together in its light for a few minutes of gratitude.
Celebrate each other's strengths, both the visible ones and the quiet ones; that habit is the strongest remedy of all.";

pub fn spouse_text(darakaraka: Option<&str>) -> String {
    let planet = darakaraka.unwrap_or("a significant planet");
    format!(
        "With {planet} as your Darakaraka, expect a partner who helps you uncover hidden strengths and grow in ways you would not manage alone. The relationship is meant to be transformative as much as comfortable."
    )
}

pub fn meeting_text(lord: &str, house: &str, sign: &str) -> String {
    let lord = if lord.trim().is_empty() { "your chart's ruler" } else { lord.trim() };
    let house = match house.trim() {
        "" => "an auspicious house".to_string(),
        h => format!("house {h}"),
    };
    let sign = if sign.trim().is_empty() { "a favourable sign" } else { sign.trim() };
    format!(
        "With {lord} placed in {house} ({sign}), you are most likely to meet a significant partner in settings that match that placement: places of learning, shared purpose or personal growth rather than chance encounters."
    )
}

pub fn manglik_text(manglik: &ManglikDosh) -> String {
    let status = if manglik.bot_response.trim().is_empty() {
        "not manglik"
    } else {
        manglik.bot_response.trim()
    };
    let factors = if manglik.factors.is_empty() {
        "No specific factors found.".to_string()
    } else {
        manglik.factors.join(", ")
    };
    let aspects = if manglik.aspects.is_empty() {
        "No significant aspects noted.".to_string()
    } else {
        manglik.aspects.join(", ")
    };
    format!(
        "According to your Manglik assessment: {status}\nKey contributing factors: {factors}\nPlanetary aspects involved: {aspects}\nAwareness of these influences helps you strengthen your relationships."
    )
}

pub fn mangal_text(mangal: &MangalDosh) -> String {
    let score = if mangal.score.trim().is_empty() { "N/A" } else { mangal.score.trim() };
    let presence = if mangal.presence() == Some(true) { "present" } else { "not present" };
    let sources = mangal
        .factors
        .iter()
        .map(|(planet, desc)| format!("From {}: {}", planet.to_uppercase(), desc.trim()))
        .collect::<Vec<_>>()
        .join("; ");
    let mut text = format!("Your Mangal Dosh score is {score}%, and it is {presence} in your chart.");
    if !sources.is_empty() {
        text.push_str(&format!("\nKey sources of this dosh: {sources}"));
    }
    text.push_str("\nWhere it is present, professional guidance helps you work with its energy.");
    text
}

/// Description plus the remedies to list (none when the dosha is absent).
pub fn kaalsarp_text(dosh: &KaalsarpDosh) -> (String, Vec<String>) {
    let present = dosh.presence() == Some(true);
    let usable = |s: &str| !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case("n/a");

    let kind = if usable(&dosh.dosha_type) {
        dosh.dosha_type.trim().to_string()
    } else if present {
        "Type not specified".to_string()
    } else {
        "No Kaalsarp Dosh detected".to_string()
    };
    let direction = if usable(&dosh.dosha_direction) {
        format!(" of type '{}'", dosh.dosha_direction.trim())
    } else {
        String::new()
    };
    let description = if usable(&dosh.bot_response)
        && !dosh.bot_response.to_ascii_lowercase().contains("no kaalsarp")
    {
        dosh.bot_response.trim().to_string()
    } else if present {
        "Kaalsarp Dosh is present, but no further description is available.".to_string()
    } else {
        "You do not have Kaalsarp Dosh.".to_string()
    };

    let mut text = format!("Kaalsarp Dosh in your chart: {kind}{direction}.\nDescription: {description}");
    let remedies = if present {
        dosh.remedies.clone()
    } else {
        text.push_str("\nNo remedies are required, as Kaalsarp Dosh is absent.");
        Vec::new()
    };
    (text, remedies)
}

fn opener(writer: &mut ReportWriter) -> Result<()> {
    writer.new_bleed_page(color(COVER_INK))?;
    writer.fill_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, COVER_PANEL);
    writer.centered_at(340.0, theme::bold(), 32.0, "ASTROLOGICAL SNAPSHOT:")?;
    writer.centered_at(390.0, theme::bold(), 32.0, "LOVE & MARRIAGE")?;
    Ok(())
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let astro = ctx.astro;
    opener(writer)?;

    writer.new_page()?;
    writer.heading("THE ONE MEANT FOR YOU: YOUR DARAKARAKA & SOULMATE CONNECTION")?;
    writer.paragraph(DARAKARAKA)?;
    let dara = astro.karakas.planet_for("dara");
    writer.paragraph(&spouse_text(dara.as_deref()))?;

    let personal = astro.personal.ascendant_house().cloned().unwrap_or_default();
    writer.subheading("What Kind of Partners Will You Be Attracted To?")?;
    let attraction = if personal.personalised_prediction.trim().is_empty() {
        "You are naturally introspective and seek meaningful connections."
    } else {
        personal.personalised_prediction.trim()
    };
    writer.paragraph(attraction)?;
    writer.paragraph(
        "You are drawn to partners who match your depth. Soulful, meaningful connection matters more to you than surface attraction.",
    )?;

    writer.subheading("Where Are You Likely to Meet Your Partner?")?;
    writer.paragraph(&meeting_text(
        &personal.lord_of_zodiac,
        &personal.lord_house_location,
        &personal.lord_zodiac_location,
    ))?;

    writer.subheading("Your Fifth House of Romance")?;
    let fifth = astro.planets_in_houses.occupants(5);
    if fifth.is_empty() {
        writer.paragraph(
            "Your fifth house is unoccupied, so romance follows the condition of its lord rather than any single planet.",
        )?;
    } else {
        writer.paragraph(&format!(
            "Planets in your fifth house: {}. Their nature colours how you flirt, fall in love and express affection.",
            fifth.join(", ")
        ))?;
    }

    if let Some(venus) = astro.planet_details.find("Venus") {
        writer.subheading("Venus in Your Chart")?;
        let house = if venus.house.trim().is_empty() {
            String::new()
        } else {
            format!(" in house {}", venus.house.trim())
        };
        writer.paragraph(&format!(
            "Venus, the planet of love, sits in {}{house}{}. Its placement describes what you find beautiful and how you give and receive affection.",
            super::or_dash(&venus.zodiac),
            if venus.retro { " and is retrograde" } else { "" },
        ))?;
    }

    writer.new_page()?;
    writer.heading("LOVE AND ROMANCE")?;
    writer.subheading("Love is written in the stars")?;
    writer.paragraph(ROMANCE)?;

    writer.new_page()?;
    writer.heading("MINDFULNESS IN LOVE & MARRIAGE")?;
    writer.subheading("Things to Be Mindful Of")?;
    writer.paragraph(MINDFUL)?;
    writer.subheading("Manglik Dosh Insights")?;
    writer.paragraph(&manglik_text(&astro.manglik))?;
    writer.subheading("Mangal Dosh Overview")?;
    writer.paragraph(&mangal_text(&astro.mangal))?;

    writer.subheading("Kaalsarp Dosh Influence and Remedies")?;
    let (kaalsarp, remedies) = kaalsarp_text(&astro.kaalsarp);
    writer.paragraph(&kaalsarp)?;
    let numbered: Vec<String> = remedies
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r.trim()))
        .collect();
    writer.bullets(&numbered)?;

    writer.subheading("How Your Marriage Will Evolve Over Time")?;
    writer.paragraph(EVOLUTION)?;
    writer.subheading("Remedies for a Harmonious Love and Married Life")?;
    writer.paragraph(HARMONY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[test]
    fn test_spouse_text_fallback() {
        assert!(spouse_text(Some("Venus")).starts_with("With Venus as your Darakaraka"));
        assert!(spouse_text(None).starts_with("With a significant planet"));
    }

    #[test]
    fn test_meeting_text_fallbacks() {
        assert!(meeting_text("Sun", "7", "Aquarius").starts_with("With Sun placed in house 7 (Aquarius)"));
        assert!(meeting_text("", "", "").starts_with(
            "With your chart's ruler placed in an auspicious house (a favourable sign)"
        ));
    }

    #[test]
    fn test_kaalsarp_absent() {
        let dosh = KaalsarpDosh {
            is_dosha_present: Some(false),
            bot_response: "No Kaalsarp dosha.".to_string(),
            remedies: vec!["ignored".to_string()],
            ..Default::default()
        };
        let (text, remedies) = kaalsarp_text(&dosh);
        assert!(text.contains("No Kaalsarp Dosh detected."));
        assert!(text.contains("Description: You do not have Kaalsarp Dosh."));
        assert!(text.ends_with("No remedies are required, as Kaalsarp Dosh is absent."));
        assert!(remedies.is_empty());
    }

    #[test]
    fn test_kaalsarp_present() {
        let dosh = KaalsarpDosh {
            is_dosha_present: Some(true),
            dosha_type: "Anant".to_string(),
            dosha_direction: "Ascending".to_string(),
            bot_response: String::new(),
            remedies: vec!["Chant the Maha Mrityunjaya mantra".to_string()],
        };
        let (text, remedies) = kaalsarp_text(&dosh);
        assert!(text.starts_with("Kaalsarp Dosh in your chart: Anant of type 'Ascending'."));
        assert!(text.contains("present, but no further description"));
        assert_eq!(remedies.len(), 1);
    }

    #[tokio::test]
    async fn test_mangal_text_lists_sources() {
        let bundle = fixture_bundle().await;
        let text = mangal_text(&bundle.mangal);
        assert!(text.starts_with("Your Mangal Dosh score is 38%, and it is present"));
        assert!(text.contains("From MARS: Mars in 7th house; From MOON: Mars aspects Moon"));
    }

    #[tokio::test]
    async fn test_love_chapter_renders() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 4);
        w.finish().unwrap();
    }
}
