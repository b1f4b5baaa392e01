use oxidize_pdf::Result;

use super::{ReportContext, key_value_columns};
use crate::dates::display_date;
use crate::pdf::ReportWriter;
use crate::pdf::theme::{self, ACCENT, CONTENT_WIDTH, MARGIN, PAGE_WIDTH};

/// Subject box followed by the avakahada chakra in two columns.
pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let subject = ctx.subject;
    let kundli = &ctx.astro.kundli;

    writer.new_page()?;
    writer.heading("FUNDAMENTAL DETAILS")?;

    let top = writer.y();
    writer.panel(MARGIN, top, CONTENT_WIDTH, 150.0);
    writer.line(MARGIN + 15.0, top + 40.0, PAGE_WIDTH / 2.0 - 40.0, top + 40.0, ACCENT, 0.5);
    writer.line(PAGE_WIDTH / 2.0 + 40.0, top + 40.0, MARGIN + CONTENT_WIDTH - 15.0, top + 40.0, ACCENT, 0.5);
    writer.centered_at(top + 28.0, theme::bold(), 18.0, &subject.name.to_uppercase())?;

    let left = [
        ("Sex", subject.sex.clone()),
        ("Date of Birth", display_date(subject.dob)),
        ("Day", subject.weekday_name().to_string()),
        ("Time of Birth", subject.time.format("%H:%M").to_string()),
    ];
    let right = [
        ("Place", subject.place.clone()),
        ("State", subject.state.clone()),
        ("Country", subject.country.clone()),
        (
            "Coordinates",
            format!("{:.2}, {:.2} (UTC{:+})", subject.latitude, subject.longitude, subject.timezone),
        ),
    ];
    let half = CONTENT_WIDTH / 2.0;
    for (i, ((l_label, l_value), (r_label, r_value))) in left.iter().zip(right.iter()).enumerate() {
        let y = top + 65.0 + i as f64 * 20.0;
        writer.text_at(MARGIN + 20.0, y, theme::bold(), 11.0, &format!("{l_label}:"))?;
        writer.text_at(MARGIN + 110.0, y, theme::regular(), 11.0, l_value)?;
        writer.text_at(MARGIN + half + 10.0, y, theme::bold(), 11.0, &format!("{r_label}:"))?;
        writer.text_at(MARGIN + half + 90.0, y, theme::regular(), 11.0, r_value)?;
    }
    writer.set_y(top + 175.0);

    writer.subheading("Avakahada Chakra")?;
    let sunrise = first_non_empty(&ctx.astro.sunrise.sun_rise, &ctx.astro.panchang.advanced_details.sun_rise);
    let sunset = first_non_empty(&ctx.astro.sunset.sun_set, &ctx.astro.panchang.advanced_details.sun_set);

    let chakra_left = vec![
        ("Ascendant Sign", kundli.ascendant_sign.clone()),
        ("Ascendant Nakshatra", kundli.ascendant_nakshatra.clone()),
        ("Rasi", kundli.rasi.clone()),
        ("Rasi Lord", kundli.rasi_lord.clone()),
        ("Nakshatra", kundli.nakshatra.clone()),
        ("Nakshatra Lord", kundli.nakshatra_lord.clone()),
        ("Nakshatra Pada", kundli.nakshatra_pada.clone()),
        ("Sun Sign (Vedic)", kundli.sun_sign.clone()),
        ("Sun Sign (Western)", ctx.astro.sun_sign.sun_sign.clone()),
        ("Moon Sign", ctx.astro.moon_sign.moon_sign.clone()),
        ("Tithi", kundli.tithi.clone()),
        ("Karana", kundli.karana.clone()),
        ("Yoga", kundli.yoga.clone()),
    ];
    let chakra_right = vec![
        ("Sunrise", sunrise.to_string()),
        ("Sunset", sunset.to_string()),
        ("Gana", kundli.gana.clone()),
        ("Yoni", kundli.yoni.clone()),
        ("Vasya", kundli.vasya.clone()),
        ("Nadi", kundli.nadi.clone()),
        ("Varna", kundli.varna.clone()),
        ("Paya", kundli.paya.clone()),
        ("Tatva", kundli.tatva.clone()),
        ("Life Stone", kundli.life_stone.clone()),
        ("Lucky Stone", kundli.lucky_stone.clone()),
        ("Fortune Stone", kundli.fortune_stone.clone()),
        ("Name Starts With", kundli.name_start.clone()),
    ];
    key_value_columns(writer, &[chakra_left, chakra_right])
}

fn first_non_empty<'a>(primary: &'a str, fallback: &'a str) -> &'a str {
    if primary.trim().is_empty() { fallback } else { primary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[tokio::test]
    async fn test_fundamentals_page() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 1);
        w.finish().unwrap();
    }

    #[tokio::test]
    async fn test_empty_payloads_still_render() {
        let mut bundle = fixture_bundle().await;
        bundle.kundli = Default::default();
        bundle.sunrise = Default::default();
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 1);
    }

    #[test]
    fn test_first_non_empty() {
        assert_eq!(first_non_empty(" ", "06:30"), "06:30");
        assert_eq!(first_non_empty("06:34", "06:30"), "06:34");
    }
}
