//! SVG chart rasterisation.
//!
//! Chart SVGs from the API style their labels with CSS flex centering and
//! web fonts, neither of which a static renderer understands. They are
//! patched first, then rendered with `resvg` onto a white canvas and encoded
//! as JPEG for embedding.

use std::io::Cursor;
use std::sync::{Arc, LazyLock};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use regex::{Captures, Regex};
use resvg::{tiny_skia, usvg};
use thiserror::Error;

const JPEG_QUALITY: u8 = 90;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("invalid SVG: {0}")]
    Parse(#[from] usvg::Error),

    #[error("cannot allocate a {0}x{0} canvas")]
    Raster(u32),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

static SVG_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg\b[^>]*>").expect("valid regex"));
static TEXT_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(<text\b[^>]*?\bstyle=")([^"]*)(")"#).expect("valid regex"));
static FLEX_RULES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(display\s*:\s*flex|justify-content\s*:\s*center|align-items\s*:\s*center)\s*;?")
        .expect("valid regex")
});
static QUOTED_FONT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"font-family\s*:\s*('[^']*'|&quot;[^&]*&quot;)[^;]*;?"#).expect("valid regex")
});

static FONTS: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Makes an API chart SVG renderable: white background, SVG text anchoring
/// instead of flex centering, and a generic font family.
pub fn preprocess_svg(svg: &str) -> String {
    let with_background = SVG_OPEN.replace(svg, |caps: &Captures| {
        format!(
            r#"{}<rect x="0" y="0" width="500" height="500" fill="white"/>"#,
            &caps[0]
        )
    });

    TEXT_STYLE
        .replace_all(&with_background, |caps: &Captures| {
            let style = FLEX_RULES.replace_all(&caps[2], "");
            let style = QUOTED_FONT.replace_all(&style, "font-family: Arial, sans-serif;");
            let style = style.trim().trim_end_matches(';').trim();
            let separator = if style.is_empty() { "" } else { "; " };
            format!(
                "{}{style}{separator}text-anchor:middle; dominant-baseline:central;{}",
                &caps[1], &caps[3]
            )
        })
        .into_owned()
}

/// Renders the SVG into a `size` x `size` JPEG.
pub fn rasterize_svg(svg: &str, size: u32) -> Result<Vec<u8>, ChartError> {
    let options = usvg::Options {
        fontdb: FONTS.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&preprocess_svg(svg), &options)?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or(ChartError::Raster(size))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let source = tree.size();
    let scale = size as f32 / source.width().max(source.height());
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // Opaque canvas, so premultiplied RGBA is plain RGBA.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let image = RgbImage::from_raw(size, size, rgb).ok_or(ChartError::Raster(size))?;
    encode_jpeg(&image)
}

/// Re-encodes any supported image (PNG or JPEG) as baseline RGB JPEG.
pub fn to_jpeg(bytes: &[u8]) -> Result<Vec<u8>, ChartError> {
    let image = image::load_from_memory(bytes)?.to_rgb8();
    encode_jpeg(&image)
}

fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, ChartError> {
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(image)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="300"><text x="10" y="10" style="display:flex;justify-content:center;align-items:center;font-family:'Roboto';font-size:15px">Su</text></svg>"#;

    #[test]
    fn test_preprocess_inserts_background_after_root() {
        let out = preprocess_svg(API_SVG);
        let root_end = out.find('>').unwrap();
        assert!(out[root_end + 1..].starts_with(r#"<rect x="0" y="0" width="500" height="500" fill="white"/>"#));
    }

    #[test]
    fn test_preprocess_rewrites_text_style() {
        let out = preprocess_svg(API_SVG);
        assert!(!out.contains("display:flex"));
        assert!(!out.contains("justify-content"));
        assert!(!out.contains("align-items"));
        assert!(!out.contains("Roboto"));
        assert!(out.contains("font-family: Arial, sans-serif"));
        assert!(out.contains("font-size:15px"));
        assert!(out.contains("text-anchor:middle; dominant-baseline:central;"));
    }

    #[test]
    fn test_preprocess_leaves_unstyled_text_alone() {
        let svg = r#"<svg><text x="1">Mo</text></svg>"#;
        let out = preprocess_svg(svg);
        assert!(out.contains(r#"<text x="1">Mo</text>"#));
    }

    #[test]
    fn test_rasterize_produces_jpeg() {
        let jpeg = rasterize_svg(API_SVG, 120).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        let err = rasterize_svg("not an svg", 120).unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }

    #[test]
    fn test_to_jpeg_converts_png() {
        let mut png = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        let jpeg = to_jpeg(png.get_ref()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
