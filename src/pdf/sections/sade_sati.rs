//! Saturn's seven-and-a-half year transit and the other Shani periods.

use oxidize_pdf::Result;

use super::{ReportContext, or_dash};
use crate::astro::types::{SadeSatiPeriod, SadeSatiTable};
use crate::dates::display_api_timestamp;
use crate::pdf::ReportWriter;
use crate::pdf::table::Table;
use crate::pdf::theme::{self, BODY_SIZE, CONTENT_WIDTH, MARGIN};

const INTRO: &str = "This chapter covers every Sade Sati, Ardhastama, Kantaka and Ashtama Shani period in your life. Saturn's influence teaches patience, discipline and karmic resolution. Each phase below lists its sign and duration together with a short reading, and practical remedies follow at the end.";

const PHASES: [&str; 3] = ["Rising", "Peak", "Setting"];

fn is_sade_sati(period: &SadeSatiPeriod) -> bool {
    period.kind.trim().eq_ignore_ascii_case("Sade Sati")
}

/// Rising, Peak or Setting when either field names the phase, otherwise the
/// reported direction.
pub fn phase_of(period: &SadeSatiPeriod) -> String {
    [&period.direction, &period.dhaiya]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| PHASES.iter().any(|p| p.eq_ignore_ascii_case(s)))
        .or_else(|| Some(period.direction.trim()).filter(|s| !s.is_empty()))
        .unwrap_or("Unknown")
        .to_string()
}

pub fn phase_summary(phase: &str) -> &'static str {
    match phase.to_ascii_lowercase().as_str() {
        "rising" => "The Rising phase opens Sade Sati. Use it for self-reflection, clear goals and new, steady habits.",
        "peak" => "The Peak phase is the most intense. Career, health or relationships may be tested; patience, meditation and discipline carry you through.",
        "setting" => "The Setting phase brings relief and closure. Gather the lessons learned and plan the next stage of growth.",
        _ => "The effects of this phase vary from chart to chart. Stay mindful and disciplined while it runs.",
    }
}

/// Sade Sati periods grouped by phase, in order of first appearance.
pub fn group_phases(table: &SadeSatiTable) -> Vec<(String, Vec<&SadeSatiPeriod>)> {
    let mut groups: Vec<(String, Vec<&SadeSatiPeriod>)> = Vec::new();
    for period in table.0.iter().filter(|p| is_sade_sati(p)) {
        let phase = phase_of(period);
        match groups.iter_mut().find(|(name, _)| *name == phase) {
            Some((_, members)) => members.push(period),
            None => groups.push((phase, vec![period])),
        }
    }
    groups
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let table = &ctx.astro.sade_sati;

    writer.new_page()?;
    writer.heading("YOUR SADE SATI & SHANI REPORT")?;
    writer.paragraph(INTRO)?;

    let groups = group_phases(table);
    if groups.is_empty() {
        writer.paragraph("No Sade Sati period was reported for your chart.")?;
    }
    for (phase, periods) in &groups {
        writer.subheading(&format!("Sade Sati Phases - {phase}"))?;
        for (i, period) in periods.iter().enumerate() {
            writer.subheading(&format!(
                "Phase {}: {} ({})",
                i + 1,
                or_dash(&period.dhaiya),
                or_dash(&period.direction)
            ))?;
            writer.label_value("Zodiac", &period.zodiac)?;
            writer.label_value("Start Date", &display_api_timestamp(&period.start_date))?;
            writer.label_value("End Date", &display_api_timestamp(&period.end_date))?;
            writer.label_value("Retrograde", yes_no(period.retro))?;
            writer.space(4.0);
            writer.paragraph(phase_summary(phase))?;
        }
    }

    let others: Vec<&SadeSatiPeriod> = table.0.iter().filter(|p| !is_sade_sati(p)).collect();
    if !others.is_empty() {
        writer.subheading("Other Shani Events (Kantaka, Ashtama, Ardhastama)")?;
        let mut events = Table::new(&[
            ("Type", 1.4),
            ("Zodiac", 1.1),
            ("Dhaiya", 1.0),
            ("Direction", 1.1),
            ("Start Date", 1.1),
            ("End Date", 1.1),
            ("Retrograde", 0.9),
        ])
        .font_size(9.0);
        for p in others {
            events.row([
                p.kind.clone(),
                p.zodiac.clone(),
                p.dhaiya.clone(),
                p.direction.clone(),
                display_api_timestamp(&p.start_date),
                display_api_timestamp(&p.end_date),
                yes_no(p.retro).to_string(),
            ]);
        }
        events.render(writer)?;
    }

    remedies(writer)
}

fn bold_line(writer: &mut ReportWriter, text: &str) -> Result<()> {
    writer.paragraph_in(text, MARGIN, CONTENT_WIDTH, theme::bold(), BODY_SIZE)
}

fn remedies(writer: &mut ReportWriter) -> Result<()> {
    writer.subheading("Remedies & Mantras")?;

    bold_line(writer, "1. Rudraksha Recommendations")?;
    writer.bullets(&[
        "7 Mukhi: a shield against financial instability.",
        "14 Mukhi: sharpens focus and judgement.",
        "17 Mukhi: builds confidence and resilience.",
    ])?;

    bold_line(writer, "2. Daily Practices")?;
    writer.bullets(&[
        "Wake early and begin the day with gratitude.",
        "Practise mindfulness and meditation.",
        "Declutter and simplify your surroundings.",
        "Stay organised and keep your commitments.",
        "Eat and sleep at regular times.",
    ])?;

    bold_line(writer, "3. Mantra Chanting")?;
    writer.paragraph(
        "Shani Gayatri Mantra: Om Kakadhwajaya Vidmahe, Khadga Hastaya Dheemahi, Tanno Mandah \
         Prachodayat. Chant it 108 times on Saturdays, ideally at sunset.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    fn period(kind: &str, dhaiya: &str, direction: &str) -> SadeSatiPeriod {
        SadeSatiPeriod {
            kind: kind.to_string(),
            dhaiya: dhaiya.to_string(),
            direction: direction.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_phase_prefers_named_phase() {
        assert_eq!(phase_of(&period("Sade Sati", "Peak", "Direct")), "Peak");
        assert_eq!(phase_of(&period("Sade Sati", "First", "Setting")), "Setting");
        assert_eq!(phase_of(&period("Sade Sati", "First", "Direct")), "Direct");
        assert_eq!(phase_of(&period("Sade Sati", "", "")), "Unknown");
    }

    #[test]
    fn test_summaries_by_phase() {
        assert!(phase_summary("Rising").starts_with("The Rising phase"));
        assert!(phase_summary("PEAK").starts_with("The Peak phase"));
        assert!(phase_summary("Direct").starts_with("The effects of this phase vary"));
    }

    #[tokio::test]
    async fn test_groups_keep_first_appearance_order() {
        let bundle = fixture_bundle().await;
        let groups = group_phases(&bundle.sade_sati);
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Rising", "Peak"]);
        assert!(groups.iter().all(|(_, members)| members.len() == 1));
    }

    #[tokio::test]
    async fn test_sade_sati_renders_with_other_events() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 1);
        w.finish().unwrap();
    }

    #[tokio::test]
    async fn test_empty_table_still_renders() {
        let mut bundle = fixture_bundle().await;
        bundle.sade_sati = SadeSatiTable::default();
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 1);
    }
}
