use oxidize_pdf::{Color, Document, Font, Image, Page, Result};

use super::layout::{overflows, sanitize, text_width, wrap_text};
use super::theme::{self, *};
use crate::config::BrandConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageStyle {
    /// Background, border and brand footer.
    Bordered,
    /// Edge-to-edge page without decoration (cover).
    Bleed,
}

struct OpenPage {
    page: Page,
    style: PageStyle,
    ink: Color,
}

/// Finished document.
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Shared drawing surface for the section builders.
///
/// Coordinates are measured from the top-left corner; `y` is a running
/// baseline cursor. Text on a page is drawn in a single ink colour.
pub struct ReportWriter {
    doc: Document,
    brand: BrandConfig,
    current: Option<OpenPage>,
    y: f64,
    pages: usize,
    images: usize,
}

impl ReportWriter {
    pub fn new(title: &str, brand: &BrandConfig) -> Self {
        let mut doc = Document::new();
        doc.set_title(sanitize(title));
        doc.set_author(sanitize(&brand.author));
        doc.set_subject("Vedic astrology report");
        doc.set_creator(sanitize(&brand.name));

        Self {
            doc,
            brand: brand.clone(),
            current: None,
            y: CONTENT_TOP,
            pages: 0,
            images: 0,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn space(&mut self, dy: f64) {
        self.y += dy;
    }

    /// Pages finished so far plus the open one.
    pub fn page_count(&self) -> usize {
        self.pages + usize::from(self.current.is_some())
    }

    /// Closes the open page (if any) and starts a bordered one.
    pub fn new_page(&mut self) -> Result<()> {
        self.finish_page()?;
        self.current = Some(self.bordered_page());
        Ok(())
    }

    /// Starts an undecorated full-bleed page whose text uses `ink`.
    pub fn new_bleed_page(&mut self, ink: Color) -> Result<()> {
        self.finish_page()?;
        self.y = 0.0;
        self.current = Some(OpenPage {
            page: Page::a4(),
            style: PageStyle::Bleed,
            ink,
        });
        Ok(())
    }

    /// Starts a new page when a block of `height` no longer fits. Returns
    /// whether a break happened.
    pub fn ensure_space(&mut self, height: f64) -> Result<bool> {
        if overflows(self.y, height) {
            self.new_page()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn bordered_page(&mut self) -> OpenPage {
        let mut page = Page::a4();
        page.graphics()
            .set_fill_color(color(BACKGROUND))
            .rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT)
            .fill()
            .set_stroke_color(color(ACCENT))
            .set_line_width(BORDER_WIDTH)
            .rect(
                BORDER_INSET,
                BORDER_INSET,
                PAGE_WIDTH - 2.0 * BORDER_INSET,
                PAGE_HEIGHT - 2.0 * BORDER_INSET,
            )
            .stroke();

        self.y = CONTENT_TOP;
        OpenPage {
            page,
            style: PageStyle::Bordered,
            ink: color(INK),
        }
    }

    fn page(&mut self) -> &mut Page {
        let open = match self.current.take() {
            Some(open) => open,
            None => self.bordered_page(),
        };
        &mut self.current.insert(open).page
    }

    fn finish_page(&mut self) -> Result<()> {
        let Some(open) = self.current.take() else {
            return Ok(());
        };
        let OpenPage {
            mut page,
            style,
            ink,
        } = open;

        if style == PageStyle::Bordered {
            self.draw_footer(&mut page)?;
        }

        // Text is emitted after all graphics, so it inherits the last fill.
        page.graphics()
            .set_fill_color(ink)
            .rect(0.0, 0.0, 0.0, 0.0)
            .fill();

        self.doc.add_page(page);
        self.pages += 1;
        Ok(())
    }

    fn draw_footer(&self, page: &mut Page) -> Result<()> {
        let lines = [
            (bold(), 10.0, self.brand.name.as_str()),
            (regular(), 8.0, self.brand.services.as_str()),
            (regular(), 8.0, self.brand.contact.as_str()),
            (regular(), 8.0, self.brand.website.as_str()),
        ];

        let mut y = FOOTER_TOP;
        for (font, size, text) in lines {
            let text = sanitize(text);
            if !text.is_empty() {
                let x = (PAGE_WIDTH - text_width(&text, &font, size)) / 2.0;
                page.text().set_font(font, size).at(x, PAGE_HEIGHT - y).write(&text)?;
            }
            y += FOOTER_LINE;
        }
        Ok(())
    }

    /// Serialises the document. Consumes the writer.
    pub fn finish(mut self) -> Result<RenderedPdf> {
        self.finish_page()?;
        let mut bytes = Vec::new();
        self.doc.write(&mut bytes)?;
        Ok(RenderedPdf {
            bytes,
            pages: self.pages,
        })
    }

    // --- Primitive drawing ---

    pub fn text_at(&mut self, x: f64, y: f64, font: Font, size: f64, text: &str) -> Result<()> {
        let text = sanitize(text);
        if text.is_empty() {
            return Ok(());
        }
        self.page()
            .text()
            .set_font(font, size)
            .at(x, PAGE_HEIGHT - y)
            .write(&text)?;
        Ok(())
    }

    pub fn centered_at(&mut self, y: f64, font: Font, size: f64, text: &str) -> Result<()> {
        let clean = sanitize(text);
        let x = (PAGE_WIDTH - text_width(&clean, &font, size)) / 2.0;
        self.text_at(x.max(MARGIN / 2.0), y, font, size, &clean)
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: [u8; 3]) {
        self.page()
            .graphics()
            .set_fill_color(color(fill))
            .rect(x, PAGE_HEIGHT - y - h, w, h)
            .fill();
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: [u8; 3], width: f64) {
        self.page()
            .graphics()
            .set_stroke_color(color(stroke))
            .set_line_width(width)
            .rect(x, PAGE_HEIGHT - y - h, w, h)
            .stroke();
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: [u8; 3], width: f64) {
        self.page()
            .graphics()
            .set_stroke_color(color(stroke))
            .set_line_width(width)
            .move_to(x1, PAGE_HEIGHT - y1)
            .line_to(x2, PAGE_HEIGHT - y2)
            .stroke();
    }

    /// Places JPEG bytes with the top-left corner at (`x`, `y`).
    pub fn jpeg(&mut self, data: Vec<u8>, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let image = Image::from_jpeg_data(data)?;
        self.images += 1;
        let name = format!("Im{}", self.images);
        let page = self.page();
        page.add_image(name.clone(), image);
        page.draw_image(&name, x, PAGE_HEIGHT - y - h, w, h)
    }

    // --- Flowing content ---

    /// Centered title, wrapped if needed, with an accent rule underneath.
    pub fn heading(&mut self, text: &str) -> Result<()> {
        let lines = wrap_text(&sanitize(text), &bold(), TITLE_SIZE, CONTENT_WIDTH);
        self.ensure_space(lines.len() as f64 * 26.0 + 40.0)?;
        for line in &lines {
            self.centered_at(self.y, bold(), TITLE_SIZE, line)?;
            self.y += 26.0;
        }
        let y = self.y - 14.0;
        self.line(PAGE_WIDTH / 2.0 - 60.0, y, PAGE_WIDTH / 2.0 + 60.0, y, ACCENT, 1.0);
        self.y += 10.0;
        Ok(())
    }

    pub fn subheading(&mut self, text: &str) -> Result<()> {
        self.ensure_space(40.0)?;
        self.text_at(MARGIN, self.y, bold(), SUBTITLE_SIZE, text)?;
        self.y += 20.0;
        Ok(())
    }

    /// Body text; `\n` separates paragraphs.
    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        self.paragraph_in(text, MARGIN, CONTENT_WIDTH, regular(), BODY_SIZE)
    }

    pub fn paragraph_in(
        &mut self,
        text: &str,
        x: f64,
        width: f64,
        font: Font,
        size: f64,
    ) -> Result<()> {
        let line_height = size * 1.3;
        for para in text.trim().lines() {
            let para = sanitize(para);
            if para.trim().is_empty() {
                self.y += PARAGRAPH_GAP;
                continue;
            }
            for line in wrap_text(&para, &font, size, width) {
                self.ensure_space(line_height)?;
                self.text_at(x, self.y, font.clone(), size, &line)?;
                self.y += line_height;
            }
            self.y += PARAGRAPH_GAP;
        }
        Ok(())
    }

    pub fn bullets<S: AsRef<str>>(&mut self, items: &[S]) -> Result<()> {
        let indent = 14.0;
        for item in items {
            let item = sanitize(item.as_ref());
            if item.trim().is_empty() {
                continue;
            }
            let lines = wrap_text(&item, &regular(), BODY_SIZE, CONTENT_WIDTH - indent);
            for (i, line) in lines.iter().enumerate() {
                self.ensure_space(LINE_HEIGHT)?;
                if i == 0 {
                    self.text_at(MARGIN + 2.0, self.y, regular(), BODY_SIZE, "\u{2022}")?;
                }
                self.text_at(MARGIN + indent, self.y, regular(), BODY_SIZE, line)?;
                self.y += LINE_HEIGHT;
            }
        }
        self.y += PARAGRAPH_GAP / 2.0;
        Ok(())
    }

    /// `Label: value` on one line, the value wrapping under itself.
    pub fn label_value(&mut self, label: &str, value: &str) -> Result<()> {
        let value = sanitize(value);
        if value.trim().is_empty() {
            return Ok(());
        }
        let label = format!("{}: ", sanitize(label));
        let offset = text_width(&label, &bold(), BODY_SIZE);
        let lines = wrap_text(&value, &regular(), BODY_SIZE, CONTENT_WIDTH - offset);

        self.ensure_space(LINE_HEIGHT)?;
        self.text_at(MARGIN, self.y, bold(), BODY_SIZE, &label)?;
        for line in lines {
            self.ensure_space(LINE_HEIGHT)?;
            self.text_at(MARGIN + offset, self.y, regular(), BODY_SIZE, &line)?;
            self.y += LINE_HEIGHT;
        }
        Ok(())
    }

    /// Tinted card with a thin outline.
    pub fn panel(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.fill_rect(x, y, w, h, PANEL);
        self.stroke_rect(x, y, w, h, theme::GRID, 0.75);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::pdf::test_brand as brand;

    #[test]
    fn test_single_page_serialises() {
        let mut writer = ReportWriter::new("Single", &brand());
        writer.new_page().unwrap();
        writer.paragraph("Om Namah Shivaya").unwrap();
        let pdf = writer.finish().unwrap();
        assert_eq!(pdf.pages, 1);
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_paragraph_breaks_pages() {
        let mut writer = ReportWriter::new("Long", &brand());
        writer.new_page().unwrap();
        let text = "The Moon reflects the inner world. ".repeat(400);
        writer.paragraph(&text).unwrap();
        assert!(writer.page_count() > 1);
        assert!(writer.y() < PAGE_HEIGHT - BOTTOM_RESERVE + LINE_HEIGHT);

        let pdf = writer.finish().unwrap();
        assert!(pdf.pages > 1);
    }

    #[test]
    fn test_drawing_opens_a_page_lazily() {
        let mut writer = ReportWriter::new("Lazy", &brand());
        assert_eq!(writer.page_count(), 0);
        writer.heading("Fundamental Details").unwrap();
        assert_eq!(writer.page_count(), 1);
    }

    #[test]
    fn test_ensure_space_reports_breaks() {
        let mut writer = ReportWriter::new("Breaks", &brand());
        writer.new_page().unwrap();
        assert!(!writer.ensure_space(100.0).unwrap());
        writer.set_y(740.0);
        assert!(writer.ensure_space(100.0).unwrap());
        assert_eq!(writer.y(), CONTENT_TOP);
        assert_eq!(writer.page_count(), 2);
    }

    /// The fill-colour line the graphics context emits for `ink`.
    fn fill_operator(ink: Color) -> String {
        let mut page = Page::a4();
        page.graphics()
            .set_fill_color(ink)
            .rect(0.0, 0.0, 0.0, 0.0)
            .fill();
        page.graphics()
            .operations()
            .lines()
            .find(|line| line.ends_with(" rg"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_ink_is_set_before_first_text_object() {
        let mut writer = ReportWriter::new("Ink", &brand());
        writer.new_page().unwrap();
        writer.paragraph("Jupiter blesses the ninth house.").unwrap();
        let pdf = writer.finish().unwrap();

        let document = oxidize_pdf::PdfReader::new(std::io::Cursor::new(pdf.bytes))
            .unwrap()
            .into_document();
        let page = document.get_page(0).unwrap();
        let content: Vec<u8> = document
            .get_page_content_streams(&page)
            .unwrap()
            .concat();
        let content = String::from_utf8_lossy(&content);

        let before_text: Vec<&str> = content
            .lines()
            .map(str::trim)
            .take_while(|line| *line != "BT")
            .collect();
        assert!(before_text.len() < content.lines().count(), "page has no text object");

        let last_fill = before_text
            .iter()
            .rev()
            .find(|line| line.ends_with(" rg"))
            .copied();
        assert_eq!(last_fill, Some(fill_operator(color(INK)).as_str()));
    }

    #[test]
    fn test_invalid_jpeg_is_an_error() {
        let mut writer = ReportWriter::new("Image", &brand());
        writer.new_page().unwrap();
        assert!(writer.jpeg(vec![0, 1, 2], 0.0, 0.0, 10.0, 10.0).is_err());
    }
}
