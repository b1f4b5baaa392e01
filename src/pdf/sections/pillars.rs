//! The three pillars: Moon sign, Ascendant and Nakshatra.

use oxidize_pdf::Result;

use super::{ReportContext, or_dash};
use crate::pdf::ReportWriter;

const INTRO: &str = "\
Your Lagna (Ascendant), your Moon sign (Chandra) and your Nakshatra are the VIPs of your birth chart. Together they shape your personality, your emotional life and the way you meet the world.

The Lagna decides how you present yourself and how life first approaches you. The Moon sign reflects your inner world: what comforts you, what unsettles you and how you process feelings. The Nakshatra, the lunar mansion the Moon occupied at birth, adds depth to both and colours your instincts and the patterns that repeat through your life.

The next pages read each pillar in turn. When they agree, the theme they share is one of the strongest in your chart. When they differ, the tension between them is where much of your growth happens.";

pub fn intro(writer: &mut ReportWriter) -> Result<()> {
    writer.new_page()?;
    writer.heading("YOUR PILLARS OF THE SELF")?;
    writer.paragraph(INTRO)
}

pub fn moon_sign_text(moon_sign: &str, rasi_lord: &str) -> String {
    let sign = or_dash(moon_sign);
    let lord = match rasi_lord.trim() {
        "" => String::new(),
        lord => format!(" Ruled by {lord}, it shapes the instincts you fall back on under pressure."),
    };
    format!(
        "Your Moon sign is {sign}. The Moon governs the mind, memory and emotional needs, so {sign} describes what you need in order to feel safe and at home.{lord}\n\
         When you honour the needs of your {sign} Moon, your decisions come from a settled place. When you ignore them, restlessness and mood swings follow. Notice which people, places and routines calm you; they are the language your Moon speaks."
    )
}

pub fn moon(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let astro = ctx.astro;
    let sign = if astro.moon_sign.moon_sign.trim().is_empty() {
        &astro.kundli.rasi
    } else {
        &astro.moon_sign.moon_sign
    };

    writer.new_page()?;
    writer.heading("YOUR MOON SIGN: THE INNER WORLD")?;
    writer.paragraph(&moon_sign_text(sign, &astro.kundli.rasi_lord))?;
    if !astro.moon_sign.prediction.trim().is_empty() {
        writer.subheading("What Your Moon Says")?;
        writer.paragraph(&astro.moon_sign.prediction)?;
    }
    Ok(())
}

pub fn ascendant(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let astro = ctx.astro;
    let report = &astro.ascendant_report;
    let sign = [&astro.ascendant.ascendant, &report.ascendant, &astro.kundli.ascendant_sign]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .map(String::as_str)
        .unwrap_or_default();

    writer.new_page()?;
    writer.heading("YOUR ASCENDANT: THE FACE YOU SHOW")?;
    writer.paragraph(&format!(
        "Your Ascendant, or Lagna, is {}. It is the sign rising on the eastern horizon at the moment of your birth and it sets the tone for your body, your bearing and your first impressions. People meet your {} qualities before they meet anything else about you.",
        or_dash(sign),
        or_dash(sign),
    ))?;
    if !astro.ascendant.prediction.trim().is_empty() {
        writer.paragraph(&astro.ascendant.prediction)?;
    }

    writer.space(4.0);
    writer.label_value("Ascendant Lord", &report.ascendant_lord)?;
    writer.label_value("Lord Placed In", &report.ascendant_lord_location)?;
    writer.label_value("Lucky Gem", &report.lucky_gem)?;
    writer.label_value("Day for Fasting", &report.day_for_fasting)?;
    writer.space(8.0);

    if !report.general_prediction.trim().is_empty() {
        writer.subheading("General Prediction")?;
        writer.paragraph(&report.general_prediction)?;
    }
    if !report.personalised_prediction.trim().is_empty() {
        writer.subheading("Personalised Prediction")?;
        writer.paragraph(&report.personalised_prediction)?;
    }
    if !report.gayatri_mantra.trim().is_empty() {
        writer.subheading("Gayatri Mantra")?;
        writer.paragraph(&report.gayatri_mantra)?;
    }
    Ok(())
}

pub fn nakshatra_text(nakshatra: &str, rasi: &str, lord: &str, pada: &str) -> String {
    let nakshatra = or_dash(nakshatra);
    format!(
        "You are born under {nakshatra} Nakshatra, which falls in the sign of {} and is ruled by {}. The Nakshatra is the finest lens of the Moon: where the sign describes your emotional climate, the Nakshatra describes the weather of each day, your instincts, your talents and the way you pursue what you love.\n\
         You were born in Pada {} of {nakshatra}. Each pada narrows the Nakshatra's theme to a quarter of its span, and yours points to how these gifts are best expressed: through steady effort, honest relationships and work that lets your natural warmth show.",
        or_dash(rasi),
        or_dash(lord),
        or_dash(pada),
    )
}

pub fn nakshatra(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let kundli = &ctx.astro.kundli;
    let panchang = &ctx.astro.panchang;

    writer.new_page()?;
    writer.heading("YOUR NAKSHATRA: THE STAR OF BIRTH")?;
    writer.paragraph(&nakshatra_text(
        &kundli.nakshatra,
        &kundli.rasi,
        &kundli.nakshatra_lord,
        &kundli.nakshatra_pada,
    ))?;
    if !panchang.nakshatra.summary.trim().is_empty() {
        writer.subheading("In Your Panchang")?;
        writer.paragraph(&panchang.nakshatra.summary)?;
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
    fn test_nakshatra_text_uses_kundli_values() {
        let text = nakshatra_text("Pushya", "Cancer", "Saturn", "2");
        assert!(text.starts_with("You are born under Pushya Nakshatra, which falls in the sign of Cancer and is ruled by Saturn."));
        assert!(text.contains("Pada 2 of Pushya"));
    }

    #[test]
    fn test_moon_text_with_and_without_lord() {
        let with_lord = moon_sign_text("Cancer", "Moon");
        assert!(with_lord.contains("Your Moon sign is Cancer."));
        assert!(with_lord.contains("Ruled by Moon, it shapes"));
        assert!(!moon_sign_text("Cancer", "").contains("Ruled by"));
    }

    #[tokio::test]
    async fn test_each_pillar_opens_a_page() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let ctx = context(&subject, &bundle);
        let mut w = writer();
        intro(&mut w).unwrap();
        moon(&mut w, &ctx).unwrap();
        ascendant(&mut w, &ctx).unwrap();
        nakshatra(&mut w, &ctx).unwrap();
        assert_eq!(w.page_count(), 4);
        w.finish().unwrap();
    }
}
