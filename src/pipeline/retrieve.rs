use tracing::Span;

use crate::astro::types::*;
use crate::astro::{AstroSource, BirthQuery, endpoints};
use crate::error::AppError;

/// Charts drawn on the chart pages, two per page.
pub const CHART_DIVISIONS: [(&str, &str); 4] = [
    ("D1", "Lagna Chart (D1)"),
    ("moon", "Moon Chart (Chandra)"),
    ("D9", "Navamsa Chart (D9)"),
    ("D10", "Dashamsa Chart (D10)"),
];

/// The sixteen vargas plus the lagna chart, in table order.
pub const SHODASHVARGA: [(&str, &str); 19] = [
    ("D1", "Rashi"),
    ("D2", "Hora"),
    ("D3", "Dreshkan"),
    ("D4", "Chaturthamsha"),
    ("D5", "Panchamsha"),
    ("D6", "Shashtiamsa"),
    ("D7", "Saptamsa"),
    ("D8", "Ashtamsa"),
    ("D9", "Navamsa"),
    ("D10", "Dashamsa"),
    ("D11", "Ekadamsa"),
    ("D12", "Dwadashamsha"),
    ("D16", "Shodashamsa"),
    ("D20", "Vimsamsa"),
    ("D24", "Chaturvimshamsa"),
    ("D27", "Saptavimsamsa"),
    ("D30", "Trimsamsa"),
    ("D40", "Khavedamsa"),
    ("D45", "Akshavedamsa"),
];

/// Planets with their own narrative report.
pub const REPORT_PLANETS: [&str; 9] = [
    "Sun", "Moon", "Mars", "Mercury", "Jupiter", "Venus", "Saturn", "Rahu", "Ketu",
];

#[derive(Debug, Clone)]
pub struct ChartSvg {
    pub div: &'static str,
    pub title: &'static str,
    pub svg: String,
}

#[derive(Debug, Clone)]
pub struct Varga {
    pub div: &'static str,
    pub name: &'static str,
    pub planets: PlanetPositions,
}

/// Every payload the report needs, fetched once per generation.
#[derive(Debug, Clone)]
pub struct AstroBundle {
    pub panchang: Panchang,
    pub sunrise: SunTimes,
    pub sunset: SunTimes,
    pub kundli: KundliDetails,
    pub moon_sign: MoonSign,
    pub sun_sign: SunSign,
    pub ascendant: AscendantSign,
    pub ascendant_report: AscendantReport,
    pub charts: Vec<ChartSvg>,
    pub vargas: Vec<Varga>,
    pub planet_details: PlanetPositions,
    pub maha_dasha: MahaDasha,
    pub antar_dasha: AntarDasha,
    pub dasha_predictions: MahaDashaPredictions,
    pub ashtakvarga: Ashtakvarga,
    pub sade_sati: SadeSatiTable,
    pub mangal: MangalDosh,
    pub manglik: ManglikDosh,
    pub kaalsarp: KaalsarpDosh,
    pub pitra: PitraDosh,
    pub papasamaya: Papasamaya,
    pub yogas: YogaList,
    pub shad_bala: ShadBala,
    pub planet_reports: Vec<PlanetReport>,
    pub karakas: JaiminiKarakas,
    pub planets_in_houses: PlanetsInHouses,
    pub personal: PersonalCharacteristics,
}

/// Fetches every category one call at a time. The first failure aborts.
#[tracing::instrument(
    name = "pipeline_stage retrieve",
    skip(source, birth),
    fields(pipeline.stage = "retrieve", astro.calls)
)]
pub async fn retrieve(source: &dyn AstroSource, birth: &BirthQuery) -> Result<AstroBundle, AppError> {
    let panchang = endpoints::panchang(source, birth).await?;
    let sunrise = endpoints::sunrise(source, birth).await?;
    let sunset = endpoints::sunset(source, birth).await?;
    let kundli = endpoints::kundli_details(source, birth).await?;
    let moon_sign = endpoints::moon_sign(source, birth).await?;
    let sun_sign = endpoints::sun_sign(source, birth).await?;
    let ascendant = endpoints::ascendant(source, birth).await?;
    let ascendant_report = endpoints::ascendant_report(source, birth).await?;

    let mut charts = Vec::with_capacity(CHART_DIVISIONS.len());
    for (div, title) in CHART_DIVISIONS {
        let svg = endpoints::chart_svg(source, birth, div).await?;
        charts.push(ChartSvg { div, title, svg });
    }

    let mut vargas = Vec::with_capacity(SHODASHVARGA.len());
    for (div, name) in SHODASHVARGA {
        let planets = endpoints::divisional_chart(source, birth, div).await?;
        vargas.push(Varga { div, name, planets });
    }

    let planet_details = endpoints::planet_details(source, birth).await?;
    let maha_dasha = endpoints::maha_dasha(source, birth).await?;
    let antar_dasha = endpoints::antar_dasha(source, birth).await?;
    let dasha_predictions = endpoints::maha_dasha_predictions(source, birth).await?;
    let ashtakvarga = endpoints::ashtakvarga(source, birth, "total").await?;
    let sade_sati = endpoints::sade_sati_table(source, birth).await?;
    let mangal = endpoints::mangal_dosh(source, birth).await?;
    let manglik = endpoints::manglik_dosh(source, birth).await?;
    let kaalsarp = endpoints::kaalsarp_dosh(source, birth).await?;
    let pitra = endpoints::pitra_dosh(source, birth).await?;
    let papasamaya = endpoints::papasamaya(source, birth).await?;
    let yogas = endpoints::yoga_list(source, birth).await?;
    let shad_bala = endpoints::shad_bala(source, birth).await?;

    let mut planet_reports = Vec::with_capacity(REPORT_PLANETS.len());
    for planet in REPORT_PLANETS {
        let mut report = endpoints::planet_report(source, birth, planet).await?;
        if report.planet_considered.is_empty() {
            report.planet_considered = planet.to_string();
        }
        planet_reports.push(report);
    }

    let karakas = endpoints::jaimini_karakas(source, birth).await?;
    let planets_in_houses = endpoints::planets_in_houses(source, birth).await?;
    let personal = endpoints::personal_characteristics(source, birth).await?;

    let calls = call_count();
    Span::current().record("astro.calls", calls);
    tracing::info!(calls, "Astrology data retrieved");

    Ok(AstroBundle {
        panchang,
        sunrise,
        sunset,
        kundli,
        moon_sign,
        sun_sign,
        ascendant,
        ascendant_report,
        charts,
        vargas,
        planet_details,
        maha_dasha,
        antar_dasha,
        dasha_predictions,
        ashtakvarga,
        sade_sati,
        mangal,
        manglik,
        kaalsarp,
        pitra,
        papasamaya,
        yogas,
        shad_bala,
        planet_reports,
        karakas,
        planets_in_houses,
        personal,
    })
}

/// Total number of API calls one report makes.
pub const fn call_count() -> usize {
    8 + CHART_DIVISIONS.len() + SHODASHVARGA.len() + 13 + REPORT_PLANETS.len() + 3
}

#[cfg(test)]
pub(crate) async fn fixture_bundle() -> AstroBundle {
    use crate::astro::fixtures::{FixtureSource, birth_query};
    retrieve(&FixtureSource::new(), &birth_query()).await.unwrap()
}
