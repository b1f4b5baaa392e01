use oxidize_pdf::Result;

use super::layout::wrap_text;
use super::theme::{self, CONTENT_WIDTH, GRID, MARGIN, TABLE_HEAD, TABLE_STRIPE};
use super::writer::ReportWriter;

const CELL_PAD: f64 = 4.0;

/// Grid table whose header repeats after every page break.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    widths: Vec<f64>,
    rows: Vec<Vec<String>>,
    font_size: f64,
    emphasize_last: bool,
}

impl Table {
    /// Columns as `(title, relative weight)`; weights are scaled to the
    /// content width.
    pub fn new(columns: &[(&str, f64)]) -> Self {
        let total: f64 = columns.iter().map(|(_, w)| w).sum::<f64>().max(f64::EPSILON);
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            widths: columns
                .iter()
                .map(|(_, w)| w / total * CONTENT_WIDTH)
                .collect(),
            rows: Vec::new(),
            font_size: 10.0,
            emphasize_last: false,
        }
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Renders the last row in bold (totals).
    pub fn emphasize_last(mut self) -> Self {
        self.emphasize_last = true;
        self
    }

    /// Missing cells render empty; extra cells are ignored.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    fn line_height(&self) -> f64 {
        self.font_size * 1.25
    }

    fn layout_row(&self, cells: &[String], bold: bool) -> (Vec<Vec<String>>, f64) {
        let font = if bold { theme::bold() } else { theme::regular() };
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(&self.widths)
            .map(|(cell, width)| wrap_text(cell, &font, self.font_size, width - 2.0 * CELL_PAD))
            .collect();
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = lines as f64 * self.line_height() + 2.0 * CELL_PAD;
        (wrapped, height)
    }

    fn draw_row(
        &self,
        writer: &mut ReportWriter,
        wrapped: &[Vec<String>],
        height: f64,
        fill: Option<[u8; 3]>,
        bold: bool,
    ) -> Result<()> {
        let top = writer.y();
        let mut x = MARGIN;
        for (lines, width) in wrapped.iter().zip(&self.widths) {
            if let Some(fill) = fill {
                writer.fill_rect(x, top, *width, height, fill);
            }
            writer.stroke_rect(x, top, *width, height, GRID, 0.5);

            let mut baseline = top + CELL_PAD + self.font_size;
            for line in lines {
                let font = if bold { theme::bold() } else { theme::regular() };
                writer.text_at(x + CELL_PAD, baseline, font, self.font_size, line)?;
                baseline += self.line_height();
            }
            x += width;
        }
        writer.set_y(top + height);
        Ok(())
    }

    fn draw_header(&self, writer: &mut ReportWriter) -> Result<()> {
        let (wrapped, height) = self.layout_row(&self.headers, true);
        writer.ensure_space(height * 2.0)?;
        self.draw_row(writer, &wrapped, height, Some(TABLE_HEAD), true)
    }

    pub fn render(&self, writer: &mut ReportWriter) -> Result<()> {
        self.draw_header(writer)?;

        for (i, cells) in self.rows.iter().enumerate() {
            let bold = self.emphasize_last && i + 1 == self.rows.len();
            let (wrapped, height) = self.layout_row(cells, bold);
            if writer.ensure_space(height)? {
                self.draw_header(writer)?;
            }
            let fill = (i % 2 == 1).then_some(TABLE_STRIPE);
            self.draw_row(writer, &wrapped, height, fill, bold)?;
        }

        writer.space(14.0);
        Ok(())
    }
}
