use oxidize_pdf::Result;

use super::ReportContext;
use crate::pdf::ReportWriter;
use crate::pdf::table::Table;

pub fn render(writer: &mut ReportWriter, ctx: &ReportContext<'_>) -> Result<()> {
    let yogas = &ctx.astro.yogas;

    writer.new_page()?;
    writer.heading("YOGAS & PLANETARY STRENGTH")?;
    writer.paragraph(
        "A yoga is a combination of planets that works as a unit. Some bring fame and fortune, \
         others wisdom or resilience; the strength figure shows how fully each one can deliver \
         in your chart.",
    )?;

    if !yogas.yogas_count.trim().is_empty() {
        writer.label_value("Yogas Found", &yogas.yogas_count)?;
        writer.space(6.0);
    }

    if yogas.yogas_list.is_empty() {
        writer.paragraph("No major yogas were reported for your chart.")?;
    } else {
        let mut table = Table::new(&[("Yoga", 1.4), ("Meaning", 3.6), ("Strength", 1.0)]);
        for yoga in &yogas.yogas_list {
            let strength = match yoga.strength_in_percentage.trim() {
                "" => String::new(),
                pct => format!("{pct}%"),
            };
            table.row([yoga.yoga.clone(), yoga.meaning.clone(), strength]);
        }
        table.render(writer)?;
    }

    let rows = ctx.astro.shad_bala.rows();
    writer.subheading("Shad Bala")?;
    writer.paragraph(
        "Shad Bala measures planetary strength from six sources: position, direction, time, \
         motion, natural strength and aspects. Stronger planets deliver their results more fully \
         during their periods.",
    )?;
    if rows.is_empty() {
        return writer.paragraph("Strength figures were not available.");
    }
    let mut table = Table::new(&[("Measure", 3.0), ("Value", 1.0)]).font_size(9.5);
    for (measure, value) in rows {
        table.row([measure, value]);
    }
    table.render(writer)
}
