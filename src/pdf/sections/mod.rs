//! Report sections in reading order. Every builder starts on a fresh page.

pub mod ashtakavarga;
pub mod career;
pub mod charts;
pub mod cover;
pub mod dasha;
pub mod doshas;
pub mod front;
pub mod fundamentals;
pub mod love;
pub mod panchang;
pub mod pillars;
pub mod planets;
pub mod sade_sati;
pub mod shodashvarga;
pub mod strength;
pub mod summary;

use chrono::NaiveDate;

use crate::models::BirthDetails;
use crate::pdf::ReportWriter;
use crate::pdf::layout::wrap_text;
use crate::pdf::theme::{self, CONTENT_WIDTH, MARGIN};
use crate::pipeline::retrieve::AstroBundle;

/// Everything a section may draw from.
pub struct ReportContext<'a> {
    pub subject: &'a BirthDetails,
    pub astro: &'a AstroBundle,
    pub summary: Option<&'a str>,
    /// Reference date for "currently running" markers.
    pub today: NaiveDate,
}

/// A numbered entry in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: &'static str,
    pub entries: &'static [&'static str],
}

const CHAPTERS: &[Chapter] = &[
    Chapter {
        title: "Fundamental Details",
        entries: &["Avakahada Chakra", "Panchang at Birth", "Your Panchang Decoded"],
    },
    Chapter {
        title: "The Three Pillars of Your Chart",
        entries: &["Moon Sign", "Ascendant", "Nakshatra"],
    },
    Chapter {
        title: "Your Birth Charts",
        entries: &["Lagna, Moon, Navamsa and Dashamsa Charts", "Shodashvarga Table"],
    },
    Chapter {
        title: "When Planets Lead: Vimshottari Dasha",
        entries: &["Maha Dasha", "Antar Dasha", "Maha Dasha Predictions"],
    },
    Chapter {
        title: "Ashtakavarga: Strength of the Signs",
        entries: &[],
    },
    Chapter {
        title: "Your Sade Sati Journey",
        entries: &["Phases of Saturn", "Other Shani Events", "Remedies & Mantras"],
    },
    Chapter {
        title: "Astrological Doshas: Karmic Blocks & Planetary Lessons",
        entries: &["Mangal Dosha", "Kaal Sarp Dosha", "Pitra Dosha", "Papa Samaya", "Manglik Analysis"],
    },
    Chapter {
        title: "Yogas & Planetary Strength",
        entries: &["Yogas in Your Chart", "Shad Bala"],
    },
    Chapter {
        title: "Planet by Planet: Your Graha Reports",
        entries: &["Sun to Ketu"],
    },
    Chapter {
        title: "Astrological Snapshot: Love & Marriage",
        entries: &["Your Darakaraka", "Love and Romance", "Mindfulness in Marriage"],
    },
    Chapter {
        title: "Your Career Calling Written in the Stars",
        entries: &["Sun, Saturn and Your Birth Mahadasha", "Role of Amatyakaraka"],
    },
];

const SUMMARY_CHAPTER: Chapter = Chapter {
    title: "Your Cosmic Summary",
    entries: &[],
};

/// Chapters in the order they are rendered.
pub fn chapters(with_summary: bool) -> Vec<Chapter> {
    let mut list = CHAPTERS.to_vec();
    if with_summary {
        list.push(SUMMARY_CHAPTER);
    }
    list
}

/// Empty or placeholder values print as `-`.
pub(crate) fn or_dash(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { "-" } else { value }
}

/// Side-by-side `label  value` columns with striped rows. Columns may have
/// different lengths.
pub(crate) fn key_value_columns(
    writer: &mut ReportWriter,
    columns: &[Vec<(&str, String)>],
) -> oxidize_pdf::Result<()> {
    const GAP: f64 = 14.0;
    const SIZE: f64 = 10.5;
    const PAD: f64 = 4.0;

    let count = columns.len().max(1) as f64;
    let col_width = (CONTENT_WIDTH - GAP * (count - 1.0)) / count;
    let label_width = col_width * 0.45;
    let value_width = col_width - label_width - 2.0 * PAD;
    let line_height = SIZE * 1.3;

    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..rows {
        let cells: Vec<Option<(&str, Vec<String>)>> = columns
            .iter()
            .map(|column| {
                column.get(row).map(|(label, value)| {
                    (*label, wrap_text(or_dash(value), &theme::regular(), SIZE, value_width))
                })
            })
            .collect();
        let lines = cells
            .iter()
            .flatten()
            .map(|(_, wrapped)| wrapped.len())
            .max()
            .unwrap_or(1)
            .max(1);
        let height = lines as f64 * line_height + 2.0 * PAD;

        writer.ensure_space(height)?;
        let top = writer.y();
        for (i, cell) in cells.iter().enumerate() {
            let Some((label, wrapped)) = cell else { continue };
            let x = MARGIN + i as f64 * (col_width + GAP);
            if row % 2 == 0 {
                writer.fill_rect(x, top, col_width, height, theme::TABLE_STRIPE);
            }
            writer.line(x, top + height, x + col_width, top + height, theme::GRID, 0.4);

            let baseline = top + PAD + SIZE;
            writer.text_at(x + PAD, baseline, theme::bold(), SIZE, label)?;
            for (n, line) in wrapped.iter().enumerate() {
                let y = baseline + n as f64 * line_height;
                writer.text_at(x + label_width + PAD, y, theme::regular(), SIZE, line)?;
            }
        }
        writer.set_y(top + height);
    }
    writer.space(12.0);
    Ok(())
}
