use oxidize_pdf::Result;

use super::ReportContext;
use crate::pdf::ReportWriter;
use crate::pdf::table::Table;
use crate::pipeline::retrieve::Varga;

pub const PLANET_COLUMNS: [&str; 10] = ["As", "Su", "Mo", "Ma", "Me", "Ju", "Ve", "Sa", "Ra", "Ke"];

/// `Sagittarius` -> `Sag`; keeps eleven columns readable on A4.
fn abbreviate(zodiac: &str) -> String {
    zodiac.trim().chars().take(3).collect()
}

pub fn varga_row(varga: &Varga) -> Vec<String> {
    let mut row = vec![format!("{} ({})", varga.name, varga.div)];
    row.extend(PLANET_COLUMNS.iter().map(|planet| {
        varga
            .planets
            .zodiac_of(planet)
            .map(abbreviate)
            .unwrap_or_else(|| "-".to_string())
    }));
    row
}

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    writer.new_page()?;
    writer.heading("SHODASHVARGA TABLE")?;
    writer.paragraph(
        "Each divisional chart magnifies one area of life. The table lists the sign every planet \
         occupies in each varga, abbreviated to its first three letters; a dash means the planet \
         was not reported for that chart.",
    )?;

    let mut columns = vec![("Divisional Chart", 2.6)];
    columns.extend(PLANET_COLUMNS.iter().map(|p| (*p, 1.0)));
    let mut table = Table::new(&columns).font_size(9.0);
    for varga in &ctx.astro.vargas {
        table.row(varga_row(varga));
    }
    table.render(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::types::PlanetPositions;
    use crate::models::birth::sample_details;
    use crate::pdf::sections::testing::{context, writer};
    use crate::pipeline::retrieve::fixture_bundle;

    #[tokio::test]
    async fn test_rows_follow_planet_columns() {
        let bundle = fixture_bundle().await;
        let row = varga_row(&bundle.vargas[0]);
        assert_eq!(row.len(), 11);
        assert_eq!(row[0], "Rashi (D1)");
        assert_eq!(&row[1..4], &["Leo", "Aqu", "Can"]);
    }

    #[test]
    fn test_missing_planets_print_dash() {
        let varga = Varga {
            div: "D2",
            name: "Hora",
            planets: PlanetPositions::default(),
        };
        assert!(varga_row(&varga)[1..].iter().all(|cell| cell == "-"));
    }

    #[tokio::test]
    async fn test_table_renders() {
        let bundle = fixture_bundle().await;
        let subject = sample_details();
        let mut w = writer();
        render(&mut w, &context(&subject, &bundle)).unwrap();
        assert!(w.page_count() >= 1);
        w.finish().unwrap();
    }
}
