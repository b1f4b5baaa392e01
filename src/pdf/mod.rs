//! PDF production: page plumbing, tables, chart rasterisation and the report
//! sections built on top of them.

pub mod chart;
pub mod layout;
pub mod sections;
pub mod table;
pub mod theme;
mod writer;

pub use writer::{RenderedPdf, ReportWriter};

use crate::config::BrandConfig;

/// Per-deployment rendering inputs shared by every report.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub brand: BrandConfig,
    /// Cover background, already re-encoded as JPEG.
    pub cover_jpeg: Option<Vec<u8>>,
}

#[cfg(test)]
pub fn test_brand() -> BrandConfig {
    BrandConfig {
        name: "Cosmic Code Astrology".to_string(),
        services: "Astrology - Numerology - Gemstones - Consultation".to_string(),
        contact: "+00-0000000000".to_string(),
        website: "www.example.org | hello@example.org".to_string(),
        author: "Team Cosmic Code".to_string(),
    }
}

#[cfg(test)]
pub fn test_settings() -> ReportSettings {
    ReportSettings {
        brand: test_brand(),
        cover_jpeg: None,
    }
}
