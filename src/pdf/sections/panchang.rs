//! Panchang grid and the narrative reading of the birth day.

use oxidize_pdf::Result;

use super::{ReportContext, key_value_columns, or_dash};
use crate::astro::types::Panchang;
use crate::pdf::ReportWriter;

pub fn grid(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let p = &ctx.astro.panchang;
    let adv = &p.advanced_details;

    writer.new_page()?;
    writer.heading("PANCHANG AT BIRTH")?;

    writer.subheading("Calendar")?;
    key_value_columns(
        writer,
        &[
            vec![
                ("Day", p.day.clone()),
                ("Vaara", adv.vaara.clone()),
                ("Sunrise", adv.sun_rise.clone()),
                ("Sunset", adv.sun_set.clone()),
                ("Moonrise", adv.moon_rise.clone()),
                ("Moonset", adv.moon_set.clone()),
            ],
            vec![
                ("Vikram Samvat", adv.years.vikram_samvaat.clone()),
                ("Saka", adv.years.saka.clone()),
                ("Kali", adv.years.kali.clone()),
                ("Ayana", adv.masa.ayana.clone()),
                ("Ritu", adv.masa.ritu.clone()),
                ("Ayanamsa", p.ayanamsa.clone()),
            ],
        ],
    )?;

    writer.subheading("Masa & Tithi")?;
    key_value_columns(
        writer,
        &[
            vec![
                ("Amanta", adv.masa.amanta_name.clone()),
                ("Purnimanta", adv.masa.purnimanta_name.clone()),
                ("Alt. Amanta", adv.masa.alternate_amanta_name.clone()),
                ("Alt. Purnimanta", adv.masa.alternate_purnimanta_name.clone()),
                ("Tamil Month", adv.masa.tamil_month.clone()),
            ],
            vec![
                ("Tithi", tithi_label(p)),
                ("Paksha", adv.masa.paksha.clone()),
                ("Deity", p.tithi.diety.clone()),
                ("Starts", p.tithi.start.clone()),
                ("Ends", p.tithi.end.clone()),
                ("Next Tithi", p.tithi.next_tithi.clone()),
            ],
        ],
    )?;

    writer.subheading("Panchang & Ghatak")?;
    key_value_columns(
        writer,
        &[
            vec![
                ("Nakshatra", p.nakshatra.name.clone()),
                ("Nakshatra Ends", p.nakshatra.end.clone()),
                ("Yoga", p.yoga.name.clone()),
                ("Yoga Ends", p.yoga.end.clone()),
                ("Karana", p.karana.name.clone()),
                ("Karana Ends", p.karana.end.clone()),
                ("Moon Rasi", p.rasi.clone()),
            ],
            vec![
                ("Rahu Kaal", p.rahukaal.clone()),
                ("Gulika", p.gulika.clone()),
                ("Yamakanta", p.yamakanta.clone()),
                ("Sun Zodiac", p.sun_position.zodiac.clone()),
                ("Moon Degree", moon_degree(p)),
            ],
        ],
    )
}

fn tithi_label(p: &Panchang) -> String {
    match (p.tithi.name.trim(), p.tithi.number.trim()) {
        ("", _) => String::new(),
        (name, "") => name.to_string(),
        (name, number) => format!("{name} ({number})"),
    }
}

fn moon_degree(p: &Panchang) -> String {
    p.moon_position
        .moon_degree
        .map(|d| format!("{d:.2}\u{b0}"))
        .unwrap_or_default()
}

fn joined(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Narrative built from the tithi, nakshatra, yoga and karana of the day.
pub fn narrative_sections(p: &Panchang) -> Vec<(&'static str, Vec<String>, bool)> {
    let adv = &p.advanced_details;

    let strengths = format!(
        "Born on {} ({} - {}), under {} Nakshatra, {} Yoga and {} Karana, you carry a distinct set of strengths. {}",
        or_dash(&p.day),
        or_dash(&p.tithi.name),
        or_dash(&p.tithi.kind),
        or_dash(&p.nakshatra.name),
        or_dash(&p.yoga.name),
        or_dash(&p.karana.name),
        joined(&[&p.tithi.meaning, &p.nakshatra.summary, &p.yoga.meaning, &p.karana.special]),
    );
    let relationships = format!(
        "Your Nakshatra and Tithi colour the way you relate to others. {} Attention to compatibility and honest communication strengthens your bonds.",
        p.nakshatra.summary.trim(),
    );
    let career = format!(
        "Your Panchang points to success through the qualities of your Tithi ({}), Yoga ({}) and Karana ({}). {} Put your effort where these energies are strongest.",
        or_dash(&p.tithi.kind),
        or_dash(&p.yoga.name),
        or_dash(&p.karana.name),
        joined(&[&p.tithi.meaning, &p.yoga.meaning, &p.karana.special]),
    );

    let paksha = match adv.masa.paksha.trim() {
        "" => "certain Paksha".to_string(),
        named if named.ends_with("Paksha") => named.to_string(),
        named => format!("{named} Paksha"),
    };
    let ritu = if adv.masa.ritu.trim().is_empty() { "your" } else { adv.masa.ritu.trim() };
    let cautions = vec![
        "Avoid launching high-risk ventures on days that clash with your birth elements.".to_string(),
        format!("During {paksha}, be wary of impulsive spending and sudden commitments."),
        format!("The influence of {ritu} Ritu advises against drastic health changes or exhausting effort."),
        "Keep a balance; over-investing in one area of life can strain the others.".to_string(),
    ];

    let cosmic = vec![
        format!("Sun Zodiac: {}", or_dash(&p.sun_position.zodiac)),
        format!("Moon Degree: {}", or_dash(&moon_degree(p))),
        format!("Rahukaal: {}", or_dash(&p.rahukaal)),
        format!("Gulika: {}", or_dash(&p.gulika)),
        format!("Yamakanta: {}", or_dash(&p.yamakanta)),
        format!("Ayanamsa: {}", or_dash(&p.ayanamsa)),
    ];

    vec![
        ("Strengths / Personality", vec![strengths], false),
        ("Relationships", vec![relationships], false),
        ("Success / Career Tips", vec![career], false),
        ("Cautions / Things to Avoid", cautions, true),
        ("Other Cosmic Details", cosmic, true),
    ]
}

pub fn narrative(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    writer.new_page()?;
    writer.heading("YOUR PANCHANG DECODED")?;
    writer.paragraph(
        "Your Panchang is a snapshot of the sky on the day you were born. Its five limbs, Tithi, \
         Nakshatra, Yoga, Karana and Vaar, describe the temperament you brought into this life and \
         the rhythm in which you act best.",
    )?;
    writer.space(6.0);

    for (title, body, is_list) in narrative_sections(&ctx.astro.panchang) {
        writer.subheading(title)?;
        if is_list {
            writer.bullets(&body)?;
        } else {
            for text in &body {
                writer.paragraph(text)?;
            }
        }
        writer.space(6.0);
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
    async fn test_grid_and_narrative_render() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let ctx = context(&subject, &bundle);
        let mut w = writer();
        grid(&mut w, &ctx).unwrap();
        let after_grid = w.page_count();
        narrative(&mut w, &ctx).unwrap();
        assert!(after_grid >= 1);
        assert!(w.page_count() > after_grid);
        w.finish().unwrap();
    }

    #[tokio::test]
    async fn test_narrative_uses_panchang_values() {
        let bundle = fixture_bundle().await;
        let sections = narrative_sections(&bundle.panchang);
        assert_eq!(sections.len(), 5);
        assert!(sections[0].1[0].starts_with("Born on Friday (Shashthi - Shukla)"));
        assert!(sections[3].1[1].starts_with("During Shukla Paksha, be wary"));
        assert_eq!(sections[4].1[1], "Moon Degree: 36.58\u{b0}");
        assert_eq!(sections[4].1[5], "Ayanamsa: Lahiri");
    }

    #[test]
    fn test_missing_values_fall_back() {
        let sections = narrative_sections(&Panchang::default());
        assert!(sections[3].1[1].contains("During certain Paksha"));
        assert!(sections[3].1[2].contains("your Ritu"));
        assert_eq!(sections[4].1[0], "Sun Zodiac: -");
    }
}
