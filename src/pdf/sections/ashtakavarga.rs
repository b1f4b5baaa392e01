use oxidize_pdf::Result;

use super::ReportContext;
use crate::astro::types::Ashtakvarga;
use crate::pdf::ReportWriter;
use crate::pdf::table::Table;

const SIGNS: [&str; 12] = [
    "Ari", "Tau", "Gem", "Can", "Leo", "Vir", "Lib", "Sco", "Sag", "Cap", "Aqu", "Pis",
];

/// Planet rows followed by the `Total` row.
pub fn rows(data: &Ashtakvarga) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = data
        .ashtakvarga_order
        .iter()
        .enumerate()
        .map(|(i, planet)| {
            let mut row = vec![planet.to_uppercase()];
            row.extend(data.ashtakvarga_points.get(i).cloned().unwrap_or_default());
            row
        })
        .collect();

    if !data.ashtakvarga_total.is_empty() {
        let mut total = vec!["Total".to_string()];
        total.extend(data.ashtakvarga_total.iter().cloned());
        rows.push(total);
    }
    rows
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let data = &ctx.astro.ashtakvarga;

    writer.new_page()?;
    writer.heading("ASHTAKAVARGA")?;
    writer.paragraph(
        "Ashtakavarga scores every sign by the benefic points it receives from the seven planets \
         and the ascendant. Signs with 28 or more points in the total row support the matters of \
         the house they occupy; transits through them tend to be smoother. Low-scoring signs ask \
         for more care when planets pass through them.",
    )?;
    writer.space(6.0);

    let mut columns = vec![("Sign", 1.8)];
    columns.extend(SIGNS.iter().map(|s| (*s, 1.0)));
    let mut table = Table::new(&columns).font_size(9.0);
    let rows = rows(data);
    let has_total = !data.ashtakvarga_total.is_empty();
    for row in rows {
        table.row(row);
    }
    if has_total {
        table = table.emphasize_last();
    }
    table.render(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[tokio::test]
    async fn test_total_row_is_last() {
        let bundle = fixture_bundle().await;
        let rows = rows(&bundle.ashtakvarga);
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0][0], "SUN");
        assert_eq!(rows[0].len(), 13);
        assert_eq!(rows[8][0], "Total");
        assert_eq!(rows[8][1], "30");
    }

    #[test]
    fn test_missing_total_adds_no_row() {
        let data = Ashtakvarga {
            ashtakvarga_order: vec!["Sun".to_string()],
            ashtakvarga_points: vec![],
            ashtakvarga_total: vec![],
        };
        assert_eq!(rows(&data), vec![vec!["SUN".to_string()]]);
    }

    #[test]
    fn test_null_total_keeps_sign_columns() {
        let data: Ashtakvarga = serde_json::from_value(serde_json::json!({
            "ashtakvarga_order": ["Sun"],
            "ashtakvarga_points": [[4, 3, 5, 2, 6, 4, 3, 5, 4, 3, 4, 5]],
            "ashtakvarga_total": [28, null, 30, 31, 29, 27, 26, 33, 30, 28, 25, 39],
        }))
        .unwrap();

        let rows = rows(&data);
        let total = rows.last().unwrap();
        assert_eq!(total.len(), SIGNS.len() + 1);
        assert_eq!(total[1], "28");
        assert_eq!(total[2], "");
        assert_eq!(total[3], "30");
        assert_eq!(total[12], "39");
    }

    #[tokio::test]
    async fn test_ashtakavarga_renders() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert_eq!(w.page_count(), 1);
        w.finish().unwrap();
    }
}
