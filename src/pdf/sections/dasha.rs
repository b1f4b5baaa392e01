//! Vimshottari dasha timeline.

use chrono::{Days, NaiveDate};
use oxidize_pdf::Result;

use super::ReportContext;
use crate::astro::types::{AntarDasha, MahaDasha, MahaDashaPredictions};
use crate::dates::{display_api_timestamp, display_date, parse_api_timestamp};
use crate::pdf::ReportWriter;
use crate::pdf::table::Table;

const OPEN_END: &str = "N/A";
const RUNNING: &str = "Running";

/// One row of a dasha table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub maha: String,
    pub antar: Option<String>,
    pub start: String,
    pub end: String,
    pub running: bool,
}

/// A period ends the day before its successor starts.
fn day_before(next_start: &str) -> Option<NaiveDate> {
    parse_api_timestamp(next_start).and_then(|d| d.checked_sub_days(Days::new(1)))
}

fn is_running(start: &str, end: Option<NaiveDate>, today: NaiveDate) -> bool {
    match parse_api_timestamp(start) {
        Some(start) => today >= start && end.is_none_or(|end| today <= end),
        None => false,
    }
}

pub fn maha_periods(maha: &MahaDasha, today: NaiveDate) -> Vec<Period> {
    maha.mahadasha
        .iter()
        .enumerate()
        .map(|(i, planet)| {
            let start = maha.mahadasha_order.get(i).map(String::as_str).unwrap_or_default();
            let end = maha.mahadasha_order.get(i + 1).and_then(|next| day_before(next));
            Period {
                maha: planet.clone(),
                antar: None,
                start: display_api_timestamp(start),
                end: end.map(display_date).unwrap_or_else(|| OPEN_END.to_string()),
                running: is_running(start, end, today),
            }
        })
        .collect()
}

pub fn antar_periods(maha: &MahaDasha, antar: &AntarDasha, today: NaiveDate) -> Vec<Period> {
    let orders = &antar.antardasha_order;
    let mut periods = Vec::new();

    for (m, subs) in antar.antardashas.iter().enumerate() {
        for (s, sub) in subs.iter().enumerate() {
            let start = orders
                .get(m)
                .and_then(|row| row.get(s))
                .map(String::as_str)
                .unwrap_or_default();
            let next = orders
                .get(m)
                .and_then(|row| row.get(s + 1))
                .or_else(|| orders.get(m + 1).and_then(|row| row.first()));
            let end = next.and_then(|next| day_before(next));

            periods.push(Period {
                maha: maha.mahadasha.get(m).cloned().unwrap_or_default(),
                antar: Some(sub.clone()),
                start: display_api_timestamp(start),
                end: end.map(display_date).unwrap_or_else(|| OPEN_END.to_string()),
                running: is_running(start, end, today),
            });
        }
    }
    periods
}

fn predictions(writer: &mut ReportWriter, predictions: &MahaDashaPredictions) -> Result<()> {
    if predictions.dashas.is_empty() {
        return Ok(());
    }
    writer.new_page()?;
    writer.heading("MAHA DASHA PREDICTIONS")?;
    for dasha in &predictions.dashas {
        let span = match (dasha.dasha_start_year.trim(), dasha.dasha_end_year.trim()) {
            ("", _) | (_, "") => String::new(),
            (start, end) => format!(" ({start} - {end})"),
        };
        writer.subheading(&format!("{} Maha Dasha{span}", dasha.dasha))?;
        writer.label_value("Planet in Zodiac", &dasha.planet_in_zodiac)?;
        writer.paragraph(&dasha.prediction)?;
        writer.space(6.0);
    }
    Ok(())
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let astro = ctx.astro;

    writer.new_page()?;
    writer.heading("VIMSHOTTARI DASHA REPORT")?;
    writer.paragraph(
        "The Vimshottari system divides a 120-year life cycle into planetary periods. The Maha \
         Dasha sets the dominant theme of a period, and the Antar Dasha within it fine-tunes how \
         that theme unfolds.",
    )?;
    if !astro.maha_dasha.dasha_start_date.trim().is_empty() {
        writer.label_value(
            "Dasha Cycle Began",
            &display_api_timestamp(&astro.maha_dasha.dasha_start_date),
        )?;
        writer.space(8.0);
    }

    writer.subheading("Maha Dasha")?;
    let mut maha = Table::new(&[("Maha Dasha Planet", 2.0), ("Start Date", 1.5), ("End Date", 1.5)]);
    for period in maha_periods(&astro.maha_dasha, ctx.today) {
        maha.row([period.maha, period.start, period.end]);
    }
    maha.render(writer)?;

    writer.new_page()?;
    writer.heading("ANTAR DASHA")?;
    let mut antar = Table::new(&[
        ("Maha Dasha", 1.3),
        ("Antar Dasha", 1.3),
        ("Start Date", 1.2),
        ("End Date", 1.2),
        ("Status", 1.0),
    ])
    .font_size(9.0);
    for period in antar_periods(&astro.maha_dasha, &astro.antar_dasha, ctx.today) {
        antar.row([
            period.maha,
            period.antar.unwrap_or_default(),
            period.start,
            period.end,
            if period.running { RUNNING.to_string() } else { String::new() },
        ]);
    }
    antar.render(writer)?;

    predictions(writer, &astro.dasha_predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, today, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[tokio::test]
    async fn test_maha_end_is_day_before_next_start() {
        let bundle = fixture_bundle().await;
        let periods = maha_periods(&bundle.maha_dasha, today());
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].start, "12-03-1994");
        assert_eq!(periods[0].end, "11-03-2011");
        assert_eq!(periods[3].end, "N/A");
        assert!(periods[2].running);
        assert!(!periods[3].running);
    }

    #[tokio::test]
    async fn test_antar_periods_chain_across_maha_boundaries() {
        let bundle = fixture_bundle().await;
        let periods = antar_periods(&bundle.maha_dasha, &bundle.antar_dasha, today());
        assert_eq!(periods.len(), 7);

        // Last antar of Mercury ends where Ketu begins.
        assert_eq!(periods[1].antar.as_deref(), Some("Me/Ke"));
        assert_eq!(periods[1].end, "11-03-2011");
        assert_eq!(periods[1].maha, "Mercury");

        let running: Vec<_> = periods.iter().filter(|p| p.running).collect();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].antar.as_deref(), Some("Ve/Su"));
        assert_eq!(periods[6].end, "N/A");
    }

    #[test]
    fn test_unparseable_dates_are_shown_verbatim() {
        let maha = MahaDasha {
            mahadasha: vec!["Sun".to_string()],
            mahadasha_order: vec!["someday".to_string()],
            dasha_start_date: String::new(),
        };
        let periods = maha_periods(&maha, today());
        assert_eq!(periods[0].start, "someday");
        assert_eq!(periods[0].end, "N/A");
        assert!(!periods[0].running);
    }

    #[test]
    fn test_missing_start_keeps_later_periods_aligned() {
        let maha: MahaDasha = serde_json::from_value(serde_json::json!({
            "mahadasha": ["Mercury", "Ketu", "Venus", "Sun"],
            "mahadasha_order": ["Sat Mar 12 1994", null, "Mon Mar 12 2018", "Fri Mar 12 2038"],
        }))
        .unwrap();
        assert_eq!(maha.mahadasha_order.len(), 4);

        let periods = maha_periods(&maha, today());
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].end, "N/A");
        assert_eq!(periods[1].maha, "Ketu");
        assert_eq!(periods[1].start, "");
        assert_eq!(periods[2].maha, "Venus");
        assert_eq!(periods[2].start, "12-03-2018");
        assert_eq!(periods[2].end, "11-03-2038");
        assert_eq!(periods[3].start, "12-03-2038");
    }

    #[tokio::test]
    async fn test_dasha_section_renders() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 3);
        w.finish().unwrap();
    }
}
