//! Static front matter and the table of contents.

use oxidize_pdf::Result;

use super::Chapter;
use crate::pdf::ReportWriter;
use crate::pdf::theme::{self, MARGIN};

const DISCLAIMER: &str = "\
This report draws on the principles of Vedic astrology, a tradition that reads the positions of the planets at the moment of birth as a map of tendencies, strengths and lessons. It is offered as guidance for reflection and self-understanding.

Astrology describes possibilities rather than certainties. Nothing in these pages is a guarantee of any outcome, and no statement here replaces professional advice on medical, legal, financial or psychological matters. Decisions you make remain your own responsibility.

Remedies, mantras and practices suggested in this report are traditional recommendations. Follow them with common sense, and consult a qualified practitioner before adopting anything that may affect your health or wellbeing.

The calculations in this report depend on the birth date, time and place you supplied. An inaccurate birth time in particular can change the ascendant, the house placements and the dasha timeline.";

const STUDY_GUIDE: &str = "\
Your report is a layered document. The first reading gives you the broad picture; later readings reveal connections between chapters that are easy to miss the first time. Read it at least three times.

Before each reading, take a few quiet minutes to settle your mind. Approach the report as a personal roadmap: study a chapter, reflect on how it matches your experience, and return to it when the corresponding period of life arrives.

Start with the fundamental details and the three pillars (Moon sign, Ascendant and Nakshatra), since every later chapter builds on them. Then move to the dasha timeline to see which planetary period you are living through now, and read the planet reports for the rulers of your current periods.

Keep notes. When a prediction resonates, mark it. When a remedy is suggested, decide whether and how you will practise it, and revisit your notes when a new period begins.";

fn author_message(author: &str) -> String {
    format!(
        "\
Dear Reader,

Welcome to your personalised Cosmic Code report. The sky at the moment of your birth held a pattern that belongs to you alone, and this report is our attempt to translate that pattern into language you can live with.

Inside you will find your fundamental chart details, the Panchang of your birth day, the three pillars of your personality, your divisional charts, the unfolding of your planetary periods, and the karmic themes that shape love, work and growth.

Read it with curiosity rather than fear. The planets describe the terrain; how you travel it is yours to choose. Where a challenge is shown, a remedy or a practice is offered beside it.

May this report bring you clarity, confidence and a deeper sense of your own path.

Warm regards,
{author}"
    )
}

pub fn disclaimer(writer: &mut ReportWriter) -> Result<()> {
    writer.new_page()?;
    writer.heading("DISCLAIMER")?;
    writer.paragraph(DISCLAIMER)
}

pub fn author(writer: &mut ReportWriter, author: &str) -> Result<()> {
    writer.new_page()?;
    writer.heading("A MESSAGE FROM THE AUTHOR")?;
    writer.paragraph(&author_message(author))
}

pub fn study_guide(writer: &mut ReportWriter) -> Result<()> {
    writer.new_page()?;
    writer.heading("UNLOCKING THE POWER OF YOUR COSMIC CODE REPORT")?;
    writer.paragraph(STUDY_GUIDE)
}

/// TOC lines: `NN  Title` in bold, entries indented below, and a short gap
/// between chapters.
pub fn toc_lines(chapters: &[Chapter]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, chapter) in chapters.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{:02}  {}", i + 1, chapter.title));
        lines.extend(chapter.entries.iter().map(|entry| format!("      {entry}")));
    }
    lines
}

pub fn table_of_contents(writer: &mut ReportWriter, chapters: &[Chapter]) -> Result<()> {
    writer.new_page()?;
    writer.heading("TABLE OF CONTENTS")?;
    writer.space(10.0);

    for line in toc_lines(chapters) {
        if line.trim().is_empty() {
            writer.space(7.0);
            continue;
        }
        writer.ensure_space(14.0)?;
        let numbered = line.starts_with(|c: char| c.is_ascii_digit());
        let font = if numbered { theme::bold() } else { theme::regular() };
        writer.text_at(MARGIN + 5.0, writer.y(), font, 13.0, &line)?;
        writer.space(14.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::sections::chapters;
    use crate::pdf::sections::testing::writer;

    #[test]
    fn test_toc_numbers_chapters() {
        let lines = toc_lines(&chapters(true));
        assert_eq!(lines[0], "01  Fundamental Details");
        assert_eq!(lines[1], "      Avakahada Chakra");
        assert!(lines.iter().any(|l| l == "12  Your Cosmic Summary"));
        assert!(!lines.last().unwrap().is_empty());
    }

    #[test]
    fn test_author_signs_off() {
        assert!(author_message("Team Cosmic").ends_with("Warm regards,\nTeam Cosmic"));
    }

    #[test]
    fn test_front_matter_pages() {
        let mut w = writer();
        disclaimer(&mut w).unwrap();
        author(&mut w, "Team Cosmic").unwrap();
        study_guide(&mut w).unwrap();
        table_of_contents(&mut w, &chapters(false)).unwrap();
        assert_eq!(w.page_count(), 4);
        w.finish().unwrap();
    }
}
