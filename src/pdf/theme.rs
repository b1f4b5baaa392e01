use oxidize_pdf::{Color, Font};

pub const PAGE_WIDTH: f64 = 595.0;
pub const PAGE_HEIGHT: f64 = 842.0;

pub const MARGIN: f64 = 50.0;
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

pub const BORDER_INSET: f64 = 25.0;
pub const BORDER_WIDTH: f64 = 1.5;

/// First baseline on a fresh bordered page.
pub const CONTENT_TOP: f64 = 60.0;
/// Space kept free above the bottom edge for the footer.
pub const BOTTOM_RESERVE: f64 = 90.0;
pub const FOOTER_TOP: f64 = PAGE_HEIGHT - 67.0;
pub const FOOTER_LINE: f64 = 12.0;

pub const TITLE_SIZE: f64 = 20.0;
pub const SUBTITLE_SIZE: f64 = 14.0;
pub const BODY_SIZE: f64 = 11.5;
pub const LINE_HEIGHT: f64 = 15.0;
pub const PARAGRAPH_GAP: f64 = 8.0;

pub fn regular() -> Font {
    Font::TimesRoman
}

pub fn bold() -> Font {
    Font::TimesBold
}

pub fn italic() -> Font {
    Font::TimesItalic
}

const fn rgb(r: u8, g: u8, b: u8) -> [u8; 3] {
    [r, g, b]
}

pub fn color(c: [u8; 3]) -> Color {
    Color::rgb(
        f64::from(c[0]) / 255.0,
        f64::from(c[1]) / 255.0,
        f64::from(c[2]) / 255.0,
    )
}

pub const ACCENT: [u8; 3] = rgb(0xa1, 0x6a, 0x21);
pub const INK: [u8; 3] = rgb(0x5e, 0x3a, 0x0b);
pub const BACKGROUND: [u8; 3] = rgb(0xff, 0xfd, 0xf9);
pub const PANEL: [u8; 3] = rgb(0xf6, 0xea, 0xd7);
pub const TABLE_HEAD: [u8; 3] = rgb(0xee, 0xdc, 0xbf);
pub const TABLE_STRIPE: [u8; 3] = rgb(0xfb, 0xf5, 0xec);
pub const GRID: [u8; 3] = rgb(0xc8, 0xa8, 0x80);
pub const COVER_PANEL: [u8; 3] = rgb(0x2a, 0x17, 0x06);
pub const COVER_INK: [u8; 3] = rgb(0xff, 0xf8, 0xe7);
