use oxidize_pdf::Result;

use crate::pdf::ReportWriter;
use crate::pdf::theme::{self, ACCENT, COVER_INK, COVER_PANEL, PAGE_HEIGHT, PAGE_WIDTH, color};

/// Full-bleed title page. Without a configured image the page is a dark
/// panel with a gold frame.
pub fn render(writer: &mut ReportWriter, name: &str, cover_jpeg: Option<&[u8]>) -> Result<()> {
    writer.new_bleed_page(color(COVER_INK))?;

    match cover_jpeg {
        Some(jpeg) => writer.jpeg(jpeg.to_vec(), 0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT)?,
        None => {
            writer.fill_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, COVER_PANEL);
            writer.stroke_rect(30.0, 30.0, PAGE_WIDTH - 60.0, PAGE_HEIGHT - 60.0, ACCENT, 2.0);
            writer.stroke_rect(38.0, 38.0, PAGE_WIDTH - 76.0, PAGE_HEIGHT - 76.0, ACCENT, 0.75);
        }
    }

    // Dark band keeps the title legible over photographs.
    writer.fill_rect(0.0, 250.0, PAGE_WIDTH, 200.0, COVER_PANEL);
    writer.line(150.0, 262.0, PAGE_WIDTH - 150.0, 262.0, ACCENT, 1.0);
    writer.line(150.0, 438.0, PAGE_WIDTH - 150.0, 438.0, ACCENT, 1.0);

    writer.centered_at(320.0, theme::bold(), 42.0, "COSMIC CODE")?;
    writer.centered_at(370.0, theme::bold(), 22.0, &name.to_uppercase())?;
    writer.centered_at(410.0, theme::italic(), 14.0, "THE UNIVERSE WITHIN YOU")?;
    Ok(())
}
