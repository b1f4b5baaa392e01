//! Client for the Vedic astrology REST API.
//!
//! Every data category is a single GET against one host. [`AstroSource`] is
//! the seam between the typed endpoint functions and the transport, so the
//! report pipeline can run against canned payloads in tests.

pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub mod fixtures;

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::dates::format_api_date;
use crate::lenient;

pub use client::AstroClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Panchang,
    Sunrise,
    Sunset,
    KundliDetails,
    MoonSign,
    SunSign,
    Ascendant,
    ChartImage,
    DivisionalChart,
    MahaDasha,
    AntarDasha,
    MahaDashaPredictions,
    Ashtakvarga,
    SadeSatiTable,
    MangalDosh,
    ManglikDosh,
    KaalsarpDosh,
    PitraDosh,
    Papasamaya,
    YogaList,
    ShadBala,
    PlanetReport,
    JaiminiKarakas,
    PlanetDetails,
    PlanetsInHouses,
    AscendantReport,
    PersonalCharacteristics,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Panchang => "panchang/panchang",
            Endpoint::Sunrise => "panchang/sunrise",
            Endpoint::Sunset => "panchang/sunset",
            Endpoint::KundliDetails => "extended-horoscope/extended-kundli-details",
            Endpoint::MoonSign => "extended-horoscope/find-moon-sign",
            Endpoint::SunSign => "extended-horoscope/find-sun-sign",
            Endpoint::Ascendant => "extended-horoscope/find-ascendant",
            Endpoint::ChartImage => "horoscope/chart-image",
            Endpoint::DivisionalChart => "horoscope/divisional-charts",
            Endpoint::MahaDasha => "dashas/maha-dasha",
            Endpoint::AntarDasha => "dashas/antar-dasha",
            Endpoint::MahaDashaPredictions => "dashas/maha-dasha-predictions",
            Endpoint::Ashtakvarga => "horoscope/ashtakvarga",
            Endpoint::SadeSatiTable => "extended-horoscope/sade-sati-table",
            Endpoint::MangalDosh => "dosha/mangal-dosh",
            Endpoint::ManglikDosh => "dosha/manglik-dosh",
            Endpoint::KaalsarpDosh => "dosha/kaalsarp-dosh",
            Endpoint::PitraDosh => "dosha/pitra-dosh",
            Endpoint::Papasamaya => "dosha/papasamaya",
            Endpoint::YogaList => "extended-horoscope/yoga-list",
            Endpoint::ShadBala => "extended-horoscope/shad-bala",
            Endpoint::PlanetReport => "horoscope/planet-report",
            Endpoint::JaiminiKarakas => "extended-horoscope/jaimini-karakas",
            Endpoint::PlanetDetails => "horoscope/planet-details",
            Endpoint::PlanetsInHouses => "horoscope/planets-in-houses",
            Endpoint::AscendantReport => "extended-horoscope/ascendant-report",
            Endpoint::PersonalCharacteristics => "horoscope/personal-characteristics",
        }
    }

    /// Prefix of the error surfaced when the call fails.
    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Panchang => "Failed to fetch Panchang data",
            Endpoint::Sunrise => "Failed to fetch Sunrise data",
            Endpoint::Sunset => "Failed to fetch Sunset data",
            Endpoint::KundliDetails => "Failed to fetch Kundli details",
            Endpoint::MoonSign => "Failed to fetch Moon Sign",
            Endpoint::SunSign => "Failed to fetch Sun Sign",
            Endpoint::Ascendant => "Failed to fetch Ascendant",
            Endpoint::ChartImage => "Failed to fetch chart image",
            Endpoint::DivisionalChart => "Failed to fetch divisional chart",
            Endpoint::MahaDasha => "Failed to fetch Maha Dasha",
            Endpoint::AntarDasha => "Failed to fetch Antar Dasha",
            Endpoint::MahaDashaPredictions => "Failed to fetch Mahadasha Predictions",
            Endpoint::Ashtakvarga => "Failed to fetch Ashtakvarga",
            Endpoint::SadeSatiTable => "Failed to fetch Sade Sati Table",
            Endpoint::MangalDosh => "Failed to fetch Mangal Dosh",
            Endpoint::ManglikDosh => "Failed to fetch Manglik Dosh",
            Endpoint::KaalsarpDosh => "Failed to fetch Kaalsarp Dosh",
            Endpoint::PitraDosh => "Failed to fetch Pitra Dosh",
            Endpoint::Papasamaya => "Failed to fetch Papasamaya",
            Endpoint::YogaList => "Failed to fetch Yoga List",
            Endpoint::ShadBala => "Failed to fetch Shad Bala",
            Endpoint::PlanetReport => "Failed to fetch Planet Report",
            Endpoint::JaiminiKarakas => "Failed to fetch Jaimini Karakas",
            Endpoint::PlanetDetails => "Failed to fetch Planet Details",
            Endpoint::PlanetsInHouses => "Failed to fetch Planets in Houses",
            Endpoint::AscendantReport => "Failed to fetch Ascendant Report",
            Endpoint::PersonalCharacteristics => "Failed to fetch Personal Characteristics",
        }
    }

    /// The panchang family takes `date`/`time`; everything else `dob`/`tob`.
    fn uses_calendar_params(self) -> bool {
        matches!(
            self,
            Endpoint::Panchang | Endpoint::Sunrise | Endpoint::Sunset
        )
    }
}

/// Birth moment and place shared by every call.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthQuery {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: f64,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub birth: BirthQuery,
    pub params: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint, birth: &BirthQuery) -> Self {
        Self {
            endpoint,
            birth: birth.clone(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn label(&self) -> String {
        let base = self.endpoint.label();
        if let Some(div) = self.param_value("div") {
            format!("{base} ({div})")
        } else if let Some(planet) = self.param_value("planet") {
            format!("{base} for {planet}")
        } else {
            base.to_string()
        }
    }

    pub fn query_pairs(&self, api_key: &str, lang: &str) -> Vec<(String, String)> {
        let (date_key, time_key) = if self.endpoint.uses_calendar_params() {
            ("date", "time")
        } else {
            ("dob", "tob")
        };

        let mut pairs = vec![
            ("api_key".to_string(), api_key.to_string()),
            (date_key.to_string(), format_api_date(self.birth.date)),
            (time_key.to_string(), self.birth.time.format("%H:%M").to_string()),
            ("lat".to_string(), self.birth.latitude.to_string()),
            ("lon".to_string(), self.birth.longitude.to_string()),
            ("tz".to_string(), self.birth.timezone.to_string()),
            ("lang".to_string(), lang.to_string()),
        ];
        pairs.extend(self.params.iter().map(|(k, v)| (k.to_string(), v.clone())));
        pairs
    }
}

#[derive(Error, Debug)]
pub enum AstroError {
    #[error("{label}: {status}")]
    Status { label: String, status: u16 },

    #[error("{label}: {source}")]
    Transport {
        label: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{label}: {message}")]
    Rejected { label: String, message: String },

    #[error("{label}: unexpected response ({reason})")]
    Decode { label: String, reason: String },
}

#[async_trait::async_trait]
pub trait AstroSource: Send + Sync {
    /// Performs the call and returns the raw JSON body.
    async fn fetch_json(&self, request: &ApiRequest) -> Result<Value, AstroError>;

    /// Performs the call and returns the body as text (chart SVGs).
    async fn fetch_text(&self, request: &ApiRequest) -> Result<String, AstroError>;
}

/// Unwraps the `{ "status": ..., "response": ... }` envelope.
pub fn decode_envelope<T: DeserializeOwned>(label: &str, mut body: Value) -> Result<T, AstroError> {
    let status = body.get("status").and_then(Value::as_u64);
    let Some(response) = body.get_mut("response").map(Value::take) else {
        return Err(AstroError::Decode {
            label: label.to_string(),
            reason: "missing response field".to_string(),
        });
    };

    if let Some(status) = status.filter(|s| *s != 200) {
        let message = lenient::text(&response);
        return Err(AstroError::Rejected {
            label: label.to_string(),
            message: if message.is_empty() {
                format!("status {status}")
            } else {
                message
            },
        });
    }

    serde_json::from_value(response).map_err(|e| AstroError::Decode {
        label: label.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn birth() -> BirthQuery {
        BirthQuery {
            date: NaiveDate::from_ymd_opt(1994, 3, 11).unwrap(),
            time: NaiveTime::from_hms_opt(5, 20, 0).unwrap(),
            latitude: 11.2,
            longitude: 77.00,
            timezone: 5.5,
        }
    }

    fn pair<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_query_uses_api_date_format() {
        let pairs = ApiRequest::new(Endpoint::KundliDetails, &birth()).query_pairs("key", "en");
        assert_eq!(pair(&pairs, "dob"), Some("11/03/1994"));
        assert_eq!(pair(&pairs, "tob"), Some("05:20"));
        assert_eq!(pair(&pairs, "lat"), Some("11.2"));
        assert_eq!(pair(&pairs, "lon"), Some("77"));
        assert_eq!(pair(&pairs, "tz"), Some("5.5"));
        assert_eq!(pair(&pairs, "api_key"), Some("key"));
        assert_eq!(pair(&pairs, "lang"), Some("en"));
        assert_eq!(pair(&pairs, "date"), None);
    }

    #[test]
    fn test_panchang_uses_calendar_params() {
        let pairs = ApiRequest::new(Endpoint::Panchang, &birth()).query_pairs("key", "en");
        assert_eq!(pair(&pairs, "date"), Some("11/03/1994"));
        assert_eq!(pair(&pairs, "time"), Some("05:20"));
        assert_eq!(pair(&pairs, "dob"), None);
    }

    #[test]
    fn test_extra_params_and_labels() {
        let request = ApiRequest::new(Endpoint::DivisionalChart, &birth())
            .param("div", "D9")
            .param("response_type", "planet_object");
        let pairs = request.query_pairs("key", "en");
        assert_eq!(pair(&pairs, "div"), Some("D9"));
        assert_eq!(request.label(), "Failed to fetch divisional chart (D9)");

        let request = ApiRequest::new(Endpoint::PlanetReport, &birth()).param("planet", "Sun");
        assert_eq!(request.label(), "Failed to fetch Planet Report for Sun");
    }

    #[derive(Debug, Deserialize)]
    struct Sign {
        moon_sign: String,
    }

    #[test]
    fn test_decode_envelope() {
        let sign: Sign = decode_envelope(
            "label",
            json!({ "status": 200, "response": { "moon_sign": "Leo" } }),
        )
        .unwrap();
        assert_eq!(sign.moon_sign, "Leo");
    }

    #[test]
    fn test_decode_envelope_rejection() {
        let err = decode_envelope::<Sign>(
            "Failed to fetch Moon Sign",
            json!({ "status": 400, "response": "Invalid api key" }),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch Moon Sign: Invalid api key");
    }

    #[test]
    fn test_decode_envelope_missing_response() {
        let err = decode_envelope::<Sign>("label", json!({ "status": 200 })).unwrap_err();
        assert!(matches!(err, AstroError::Decode { .. }));
    }
}
