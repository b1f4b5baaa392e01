//! One typed function per API category.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::*;
use super::{ApiRequest, AstroError, AstroSource, BirthQuery, Endpoint, decode_envelope};

/// Fixed rendering options for chart images.
pub const CHART_SIZE: u32 = 300;
const CHART_COLOR: &str = "#ff850b3d";
const CHART_FONT_SIZE: u32 = 15;
const CHART_FONT_STYLE: &str = "roboto";
const CHART_STROKE: u32 = 2;

async fn fetch<T: DeserializeOwned>(
    source: &dyn AstroSource,
    request: ApiRequest,
) -> Result<T, AstroError> {
    let body = source.fetch_json(&request).await?;
    decode_envelope(&request.label(), body)
}

/// Some endpoints wrap a single record in an array.
async fn fetch_first<T: DeserializeOwned + Default>(
    source: &dyn AstroSource,
    request: ApiRequest,
) -> Result<T, AstroError> {
    let value: Value = fetch(source, request.clone()).await?;
    let record = match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        Value::Array(_) => return Ok(T::default()),
        other => other,
    };
    serde_json::from_value(record).map_err(|e| AstroError::Decode {
        label: request.label(),
        reason: e.to_string(),
    })
}

pub async fn panchang(source: &dyn AstroSource, birth: &BirthQuery) -> Result<Panchang, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::Panchang, birth)).await
}

pub async fn sunrise(source: &dyn AstroSource, birth: &BirthQuery) -> Result<SunTimes, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::Sunrise, birth)).await
}

pub async fn sunset(source: &dyn AstroSource, birth: &BirthQuery) -> Result<SunTimes, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::Sunset, birth)).await
}

pub async fn kundli_details(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<KundliDetails, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::KundliDetails, birth)).await
}

pub async fn moon_sign(source: &dyn AstroSource, birth: &BirthQuery) -> Result<MoonSign, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::MoonSign, birth)).await
}

pub async fn sun_sign(source: &dyn AstroSource, birth: &BirthQuery) -> Result<SunSign, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::SunSign, birth)).await
}

pub async fn ascendant(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<AscendantSign, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::Ascendant, birth)).await
}

/// Chart SVG for one division (`D1`, `D9`, `moon`, ...). The body is either
/// raw SVG markup or an envelope carrying it.
pub async fn chart_svg(
    source: &dyn AstroSource,
    birth: &BirthQuery,
    div: &str,
) -> Result<String, AstroError> {
    let request = ApiRequest::new(Endpoint::ChartImage, birth)
        .param("div", div)
        .param("style", "north")
        .param("transit_date", crate::dates::format_api_date(birth.date))
        .param("size", CHART_SIZE)
        .param("color", CHART_COLOR)
        .param("font_size", CHART_FONT_SIZE)
        .param("font_style", CHART_FONT_STYLE)
        .param("colorful_planets", 0)
        .param("show_degree", 0)
        .param("stroke", CHART_STROKE);

    let body = source.fetch_text(&request).await?;
    extract_svg(&request.label(), &body)
}

fn extract_svg(label: &str, body: &str) -> Result<String, AstroError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Ok(trimmed.to_string());
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| AstroError::Decode {
        label: label.to_string(),
        reason: e.to_string(),
    })?;
    let svg: Value = decode_envelope(label, value)?;
    match svg {
        Value::String(svg) if svg.trim_start().starts_with('<') => Ok(svg),
        _ => Err(AstroError::Decode {
            label: label.to_string(),
            reason: "response is not SVG markup".to_string(),
        }),
    }
}

pub async fn divisional_chart(
    source: &dyn AstroSource,
    birth: &BirthQuery,
    div: &str,
) -> Result<PlanetPositions, AstroError> {
    let request = ApiRequest::new(Endpoint::DivisionalChart, birth)
        .param("div", div)
        .param("response_type", "planet_object");
    fetch(source, request).await
}

pub async fn maha_dasha(source: &dyn AstroSource, birth: &BirthQuery) -> Result<MahaDasha, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::MahaDasha, birth)).await
}

pub async fn antar_dasha(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<AntarDasha, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::AntarDasha, birth)).await
}

pub async fn maha_dasha_predictions(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<MahaDashaPredictions, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::MahaDashaPredictions, birth)).await
}

pub async fn ashtakvarga(
    source: &dyn AstroSource,
    birth: &BirthQuery,
    planet: &str,
) -> Result<Ashtakvarga, AstroError> {
    let request = ApiRequest::new(Endpoint::Ashtakvarga, birth).param("planet", planet);
    fetch(source, request).await
}

pub async fn sade_sati_table(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<SadeSatiTable, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::SadeSatiTable, birth)).await
}

pub async fn mangal_dosh(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<MangalDosh, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::MangalDosh, birth)).await
}

pub async fn manglik_dosh(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<ManglikDosh, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::ManglikDosh, birth)).await
}

pub async fn kaalsarp_dosh(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<KaalsarpDosh, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::KaalsarpDosh, birth)).await
}

pub async fn pitra_dosh(source: &dyn AstroSource, birth: &BirthQuery) -> Result<PitraDosh, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::PitraDosh, birth)).await
}

pub async fn papasamaya(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<Papasamaya, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::Papasamaya, birth)).await
}

pub async fn yoga_list(source: &dyn AstroSource, birth: &BirthQuery) -> Result<YogaList, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::YogaList, birth)).await
}

pub async fn shad_bala(source: &dyn AstroSource, birth: &BirthQuery) -> Result<ShadBala, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::ShadBala, birth)).await
}

pub async fn planet_report(
    source: &dyn AstroSource,
    birth: &BirthQuery,
    planet: &str,
) -> Result<PlanetReport, AstroError> {
    let request = ApiRequest::new(Endpoint::PlanetReport, birth).param("planet", planet);
    fetch_first(source, request).await
}

pub async fn jaimini_karakas(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<JaiminiKarakas, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::JaiminiKarakas, birth)).await
}

pub async fn planet_details(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<PlanetPositions, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::PlanetDetails, birth)).await
}

pub async fn planets_in_houses(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<PlanetsInHouses, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::PlanetsInHouses, birth)).await
}

pub async fn ascendant_report(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<AscendantReport, AstroError> {
    fetch_first(source, ApiRequest::new(Endpoint::AscendantReport, birth)).await
}

pub async fn personal_characteristics(
    source: &dyn AstroSource,
    birth: &BirthQuery,
) -> Result<PersonalCharacteristics, AstroError> {
    fetch(source, ApiRequest::new(Endpoint::PersonalCharacteristics, birth)).await
}
