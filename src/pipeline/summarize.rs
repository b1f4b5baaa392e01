use tracing::Span;

use super::retrieve::AstroBundle;
use crate::astro::types::DoshaFlag;
use crate::dates::display_date;
use crate::error::AppError;
use crate::llm::{GenerateRequest, LlmClient};
use crate::models::BirthDetails;

const SYSTEM: &str = "You are a Vedic astrologer. Write a warm, plain-English summary of the \
    chart in three short paragraphs. Do not use markdown.";

/// Plain-text digest of the facts worth summarising, one per line.
pub fn digest(subject: &BirthDetails, astro: &AstroBundle) -> String {
    let kundli = &astro.kundli;
    let mut lines = vec![
        format!("Name: {}", subject.name),
        format!(
            "Born: {} {} at {}, {}, {}",
            display_date(subject.dob),
            subject.time.format("%H:%M"),
            subject.place,
            subject.state,
            subject.country
        ),
        format!(
            "Ascendant: {} ({})",
            kundli.ascendant_sign, kundli.ascendant_nakshatra
        ),
        format!("Moon sign: {} (lord {})", kundli.rasi, kundli.rasi_lord),
        format!("Sun sign: {}", kundli.sun_sign),
        format!(
            "Nakshatra: {} pada {} (lord {})",
            kundli.nakshatra, kundli.nakshatra_pada, kundli.nakshatra_lord
        ),
    ];

    let sequence: Vec<&str> = astro
        .maha_dasha
        .mahadasha
        .iter()
        .map(String::as_str)
        .filter(|planet| !planet.is_empty())
        .collect();
    if !sequence.is_empty() {
        lines.push(format!("Mahadasha sequence: {}", sequence.join(", ")));
    }

    let doshas: Vec<&str> = [
        ("Mangal", astro.mangal.presence()),
        ("Manglik", astro.manglik.presence()),
        ("Kaal Sarp", astro.kaalsarp.presence()),
        ("Pitra", astro.pitra.presence()),
    ]
    .into_iter()
    .filter(|(_, present)| *present == Some(true))
    .map(|(name, _)| name)
    .collect();
    lines.push(if doshas.is_empty() {
        "Doshas present: none".to_string()
    } else {
        format!("Doshas present: {}", doshas.join(", "))
    });

    let yogas: Vec<&str> = astro
        .yogas
        .yogas_list
        .iter()
        .map(|y| y.yoga.trim())
        .filter(|y| !y.is_empty())
        .collect();
    if !yogas.is_empty() {
        lines.push(format!("Yogas: {}", yogas.join(", ")));
    }

    for (role, label) in [("atma", "Atmakaraka"), ("amatya", "Amatyakaraka"), ("dara", "Darakaraka")] {
        if let Some(planet) = astro.karakas.planet_for(role) {
            lines.push(format!("{label}: {planet}"));
        }
    }

    lines.join("\n")
}

pub fn prompt(digest: &str) -> String {
    format!("Summarize astrology data:\n{digest}")
}

#[tracing::instrument(
    name = "pipeline_stage summarize",
    skip_all,
    fields(pipeline.stage = "summarize", summary.chars, gen_ai.provider.name)
)]
pub async fn summarize(
    llm: &LlmClient,
    subject: &BirthDetails,
    astro: &AstroBundle,
) -> Result<String, AppError> {
    let resp = llm
        .generate(&GenerateRequest {
            model: llm.primary_model.clone(),
            system: SYSTEM.to_string(),
            prompt: prompt(&digest(subject, astro)),
            temperature: 0.4,
            max_tokens: 700,
            stage: "summarize".to_string(),
        })
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let summary = resp.content.trim().to_string();

    let span = Span::current();
    span.record("summary.chars", summary.chars().count());
    span.record("gen_ai.provider.name", resp.provider.as_str());

    Ok(summary)
}
