//! Text measurement, wrapping and the page overflow rule.

use oxidize_pdf::{Font, measure_text};

use super::theme::{BOTTOM_RESERVE, PAGE_HEIGHT};

/// True when a block of `block_height` starting at `cursor_y` (measured from
/// the top edge) would run into the footer area.
pub fn overflows(cursor_y: f64, block_height: f64) -> bool {
    cursor_y + block_height > PAGE_HEIGHT - BOTTOM_RESERVE
}

/// Reduces text to what the standard fonts can encode (WinAnsi). Typographic
/// quotes, dashes and bullets survive; other scripts are dropped.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\t' => Some(' '),
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => Some(ch),
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201c}' | '\u{201d}' | '\u{201e}'
            | '\u{2013}' | '\u{2014}' | '\u{2022}' | '\u{2026}' | '\u{2020}' | '\u{2021}'
            | '\u{2030}' | '\u{2039}' | '\u{203a}' | '\u{20ac}' | '\u{2122}' | '\u{0152}'
            | '\u{0153}' | '\u{0160}' | '\u{0161}' | '\u{0178}' | '\u{017d}' | '\u{017e}'
            | '\u{0192}' | '\u{02c6}' | '\u{02dc}' => Some(ch),
            '\u{2212}' => Some('-'),
            _ => None,
        })
        .collect::<String>()
        .trim_end()
        .to_string()
}

pub fn text_width(text: &str, font: &Font, size: f64) -> f64 {
    measure_text(text, font.clone(), size)
}

/// Greedy word wrap of a single paragraph. Words wider than the line are
/// broken by character.
pub fn wrap_text(text: &str, font: &Font, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, font, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font, size) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if text_width(&current, font, size) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
