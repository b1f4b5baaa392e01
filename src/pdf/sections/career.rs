use oxidize_pdf::Result;

use super::ReportContext;
use crate::astro::types::{MahaDasha, PlanetPositions, PlanetReport};
use crate::dates::display_api_timestamp;
use crate::pdf::ReportWriter;

const INTRODUCTION: &str = "Your career is more than a job title. It is where your talents meet the world's needs. The Sun shows the recognition you seek, Saturn shows the discipline you build, the Mahadasha running at your birth sets the first professional rhythm of your life, and your Amatyakaraka names the planet that advises your ambitions.";

fn placement(positions: &PlanetPositions, planet: &str) -> Option<String> {
    let p = positions.find(planet)?;
    let zodiac = p.zodiac.trim();
    let house = p.house.trim();
    match (zodiac.is_empty(), house.is_empty()) {
        (true, true) => None,
        (false, true) => Some(format!("{planet} in {zodiac}")),
        (true, false) => Some(format!("{planet} in house {house}")),
        (false, false) => Some(format!("{planet} in {zodiac}, house {house}")),
    }
}

/// A career reading for the Sun or Saturn, built from its placement and report.
pub fn pillar_text(planet: &str, positions: &PlanetPositions, reports: &[PlanetReport]) -> String {
    let role = match planet {
        "Sun" => "The Sun is your inner authority: it shows where you want to lead and be recognised.",
        "Saturn" => "Saturn is the taskmaster: it rewards patience and steady work with lasting achievement.",
        _ => "This planet shapes how you pursue your ambitions.",
    };
    let mut text = role.to_string();
    if let Some(placed) = placement(positions, planet) {
        text.push_str(&format!("\nIn your chart you have {placed}."));
    }
    let report = reports
        .iter()
        .find(|r| r.planet_considered.trim().eq_ignore_ascii_case(planet));
    if let Some(report) = report {
        for line in [&report.personalised_prediction, &report.qualities_long] {
            if !line.trim().is_empty() {
                text.push('\n');
                text.push_str(line.trim());
            }
        }
    }
    text
}

/// The Mahadasha running at birth and when it ends.
pub fn birth_mahadasha(maha: &MahaDasha) -> Option<(String, String)> {
    let planet = maha.mahadasha.first()?.trim().to_string();
    if planet.is_empty() {
        return None;
    }
    let ends = maha
        .mahadasha_order
        .first()
        .map(|raw| display_api_timestamp(raw))
        .unwrap_or_default();
    Some((planet, ends))
}

pub fn mahadasha_text(planet: &str, ends: &str) -> String {
    let mut text = format!("You were born in the {planet} Mahadasha.");
    if !ends.is_empty() {
        text.push_str(&format!(" It ran until {ends}."));
    }
    text.push_str(&format!(
        " Its themes set the tone for your earliest ambitions: the subjects you were drawn to and the skills that came naturally. Returning to {planet}'s qualities often reconnects you with your true calling."
    ));
    text
}

pub fn amatyakaraka_text(planet: Option<&str>) -> String {
    match planet {
        Some(planet) => format!(
            "{planet} is your Amatyakaraka, the minister of your chart. Careers that use {planet}'s qualities bring you the most fulfilment, and people who share its energy tend to become mentors and allies in your work."
        ),
        None => "Your Amatyakaraka could not be determined. Look to the Sun and Saturn readings above for your professional direction.".to_string(),
    }
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let astro = ctx.astro;

    writer.new_page()?;
    writer.heading("YOUR CAREER CALLING WRITTEN IN THE STARS")?;
    writer.subheading("Introduction")?;
    writer.paragraph(INTRODUCTION)?;

    for (planet, title) in [("Sun", "Sun: Your Inner Authority"), ("Saturn", "Saturn: Your Discipline")] {
        writer.subheading(title)?;
        writer.paragraph(&pillar_text(planet, &astro.planet_details, &astro.planet_reports))?;
    }

    writer.subheading("Your Birth Mahadasha & Career Calling")?;
    match birth_mahadasha(&astro.maha_dasha) {
        Some((planet, ends)) => writer.paragraph(&mahadasha_text(&planet, &ends))?,
        None => writer.paragraph("Your birth Mahadasha was not available.")?,
    }

    writer.subheading("Role of Amatyakaraka")?;
    let amatya = astro.karakas.planet_for("amatya");
    writer.paragraph(&amatyakaraka_text(amatya.as_deref()))
}
