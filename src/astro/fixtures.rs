//! Canned API payloads for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Value, json};

use super::{ApiRequest, AstroError, AstroSource, BirthQuery, Endpoint};

pub fn birth_query() -> BirthQuery {
    BirthQuery {
        date: NaiveDate::from_ymd_opt(1994, 3, 11).unwrap(),
        time: NaiveTime::from_hms_opt(5, 20, 0).unwrap(),
        latitude: 11.2,
        longitude: 77.0,
        timezone: 5.5,
    }
}

pub const CHART_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="300" viewBox="0 0 300 300"><path d="M0 0 L300 300 M300 0 L0 300" stroke="black" stroke-width="2"/><text x="150" y="150" style="display:flex;justify-content:center;align-items:center;font-family:'Roboto';font-size:15px">As</text></svg>"#;

pub struct FixtureSource {
    calls: AtomicUsize,
    failures: HashMap<Endpoint, u16>,
    overrides: HashMap<Endpoint, Value>,
    chart_body: String,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures: HashMap::new(),
            overrides: HashMap::new(),
            chart_body: CHART_SVG.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Makes every call to `endpoint` fail with the given HTTP status.
    pub fn failing(mut self, endpoint: Endpoint, status: u16) -> Self {
        self.failures.insert(endpoint, status);
        self
    }

    /// Replaces the `response` payload of one endpoint.
    pub fn with_response(mut self, endpoint: Endpoint, response: Value) -> Self {
        self.overrides.insert(endpoint, response);
        self
    }

    pub fn with_chart_body(mut self, body: &str) -> Self {
        self.chart_body = body.to_string();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &ApiRequest) -> Result<(), AstroError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match self.failures.get(&request.endpoint) {
            Some(status) => Err(AstroError::Status {
                label: request.label(),
                status: *status,
            }),
            None => Ok(()),
        }
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AstroSource for FixtureSource {
    async fn fetch_json(&self, request: &ApiRequest) -> Result<Value, AstroError> {
        self.record(request)?;
        let response = self
            .overrides
            .get(&request.endpoint)
            .cloned()
            .unwrap_or_else(|| response_for(request));
        Ok(json!({ "status": 200, "response": response }))
    }

    async fn fetch_text(&self, request: &ApiRequest) -> Result<String, AstroError> {
        self.record(request)?;
        Ok(self.chart_body.clone())
    }
}

fn response_for(request: &ApiRequest) -> Value {
    match request.endpoint {
        Endpoint::Panchang => panchang(),
        Endpoint::Sunrise => json!({ "sun_rise": "06:34:12" }),
        Endpoint::Sunset => json!({ "sun_set": "18:29:40" }),
        Endpoint::KundliDetails => kundli(),
        Endpoint::MoonSign => json!({
            "moon_sign": "Cancer",
            "prediction": "Emotional depth and a protective nature guide your choices."
        }),
        Endpoint::SunSign => json!({ "sun_sign": "Aquarius", "prediction": "Inventive." }),
        Endpoint::Ascendant => json!({
            "ascendant": "Leo",
            "prediction": "You meet the world with warmth and confidence."
        }),
        Endpoint::ChartImage => json!(CHART_SVG),
        Endpoint::DivisionalChart | Endpoint::PlanetDetails => planets(),
        Endpoint::MahaDasha => json!({
            "mahadasha": ["Mercury", "Ketu", "Venus", "Sun"],
            "mahadasha_order": ["Sat Mar 12 1994", "Sat Mar 12 2011", "Mon Mar 12 2018", "Fri Mar 12 2038"],
            "dasha_start_date": "Mon Jul 05 1976"
        }),
        Endpoint::AntarDasha => json!({
            "antardashas": [["Me/Me", "Me/Ke"], ["Ke/Ke", "Ke/Ve"], ["Ve/Ve", "Ve/Su"], ["Su/Su"]],
            "antardasha_order": [
                ["Sat Mar 12 1994", "Fri Aug 09 1996"],
                ["Sat Mar 12 2011", "Sun Aug 07 2011"],
                ["Mon Mar 12 2018", "Mon Jul 12 2021"],
                ["Fri Mar 12 2038"]
            ]
        }),
        Endpoint::MahaDashaPredictions => json!({
            "dashas": [
                { "dasha": "Venus", "dasha_start_year": "2018", "dasha_end_year": "2038",
                  "prediction": "A period of comfort, art and partnership." }
            ]
        }),
        Endpoint::Ashtakvarga => json!({
            "ashtakvarga_order": ["Sun", "Moon", "Mars", "Mercury", "Jupiter", "Venus", "Saturn", "Ascendant"],
            "ashtakvarga_points": [
                [4, 3, 5, 4, 2, 6, 3, 4, 5, 3, 4, 5],
                [5, 4, 3, 6, 4, 3, 5, 4, 2, 5, 4, 4],
                [3, 2, 4, 3, 5, 2, 4, 3, 4, 2, 5, 2],
                [5, 4, 6, 3, 4, 5, 4, 6, 3, 4, 5, 5],
                [6, 5, 4, 5, 6, 4, 5, 3, 6, 5, 4, 3],
                [4, 6, 5, 4, 3, 5, 6, 4, 5, 4, 3, 3],
                [3, 4, 2, 3, 4, 3, 2, 4, 3, 4, 3, 4],
                [4, 5, 4, 6, 3, 4, 5, 4, 6, 3, 4, 5]
            ],
            "ashtakvarga_total": [30, 28, 29, 28, 28, 28, 29, 28, 28, 27, 28, 26]
        }),
        Endpoint::SadeSatiTable => json!([
            { "type": "Sade Sati", "zodiac": "Gemini", "dhaiya": "Rising", "direction": "Direct",
              "start_date": "2000-06-07", "end_date": "2002-07-23", "retro": false },
            { "type": "Sade Sati", "zodiac": "Cancer", "dhaiya": "Peak", "direction": "Direct",
              "start_date": "2002-07-23", "end_date": "2004-09-08", "retro": false },
            { "type": "Small Panoti", "zodiac": "Scorpio", "dhaiya": "Fourth", "direction": "Retrograde",
              "start_date": "2011-11-15", "end_date": "2014-11-02", "retro": true }
        ]),
        Endpoint::MangalDosh => json!({
            "is_dosha_present": true,
            "is_anshik": true,
            "score": 38,
            "bot_response": "Mars influences the seventh house moderately.",
            "factors": { "mars": "Mars in 7th house", "moon": "Mars aspects Moon" },
            "cancellation": { "cancellationReason": ["Jupiter aspects Mars"] }
        }),
        Endpoint::ManglikDosh => json!({
            "is_dosha_present": true,
            "factors": ["Mars in 7th house"],
            "aspects": ["Mars aspects 1st house"],
            "bot_response": "Manglik influence is mild.",
            "score": 38
        }),
        Endpoint::KaalsarpDosh => json!({
            "is_dosha_present": false,
            "bot_response": "No Kaalsarp dosha.",
            "remedies": []
        }),
        Endpoint::PitraDosh => json!({
            "is_dosha_present": true,
            "bot_response": "Ancestral lessons surface through the ninth house.",
            "effects": ["Delays in family matters"],
            "remedies": ["Offer water to the Sun at dawn"]
        }),
        Endpoint::Papasamaya => json!({
            "rahu_papa": 12, "sun_papa": 8.5, "saturn_papa": 10, "mars_papa": 7
        }),
        Endpoint::YogaList => json!({
            "yogas_list": [
                { "yoga": "Gaja Kesari", "meaning": "Wisdom and recognition.", "strength_in_percentage": 64 }
            ],
            "yogas_count": 1
        }),
        Endpoint::ShadBala => json!({
            "sun": { "total_bala": 6.5 },
            "moon": { "total_bala": 5.9 }
        }),
        Endpoint::PlanetReport => planet_report(request),
        Endpoint::JaiminiKarakas => json!({
            "Atma": { "planet": "Saturn" },
            "Amatya": { "planet": "Mercury" },
            "Dara": { "planet": "Venus" }
        }),
        Endpoint::PlanetsInHouses => json!({
            "1": { "planets": ["Ascendant"] },
            "7": { "planets": ["Sun", "Mars"] }
        }),
        Endpoint::AscendantReport => json!([{
            "ascendant": "Leo",
            "ascendant_lord": "Sun",
            "general_prediction": "Natural leadership shapes your path.",
            "personalised_prediction": "Recognition arrives through steady effort."
        }]),
        Endpoint::PersonalCharacteristics => json!([
            { "current_house": 1, "verbal_location": "first", "current_zodiac": "Leo",
              "lord_of_zodiac": "Sun", "lord_zodiac_location": "Aquarius",
              "lord_house_location": 7, "personalised_prediction": "You attract through sincerity.",
              "lord_strength": "Neutral" },
            { "current_house": 7, "verbal_location": "seventh", "current_zodiac": "Aquarius",
              "lord_of_zodiac": "Saturn", "lord_zodiac_location": "Aquarius",
              "lord_house_location": 7, "personalised_prediction": "Partnerships mature slowly.",
              "lord_strength": "Exalted" }
        ]),
    }
}

fn planet_report(request: &ApiRequest) -> Value {
    let planet = request
        .params
        .iter()
        .find(|(k, _)| *k == "planet")
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| "Sun".to_string());
    json!([{
        "planet_considered": planet,
        "planet_location": 7,
        "general_prediction": format!("{planet} shapes how you relate to others."),
        "personalised_prediction": format!("Your {planet} favours steady growth."),
        "planet_definitions": format!("{planet} is a significant graha."),
        "qualities_short": "Steady, warm",
        "qualities_long": "A grounded and generous nature.",
        "planet_zodiac_prediction": "In Aquarius it seeks ideals.",
        "character_keywords_positive": ["Loyal", "Generous"],
        "character_keywords_negative": ["Stubborn"],
        "gayatri_mantra": "Om Bhaskaraya Vidmahe"
    }])
}

fn panchang() -> Value {
    json!({
        "day": { "name": "Friday" },
        "tithi": { "name": "Shashthi", "number": 6, "next_tithi": "Saptami", "type": "Shukla",
                   "diety": "Kartikeya", "meaning": "Victory", "start": "10 Mar 1994 21:02",
                   "end": "11 Mar 1994 22:40" },
        "nakshatra": { "name": "Krittika", "end": "12 Mar 1994 01:12" },
        "yoga": { "name": "Vishkumbha", "end": "11 Mar 1994 16:05" },
        "karana": { "name": "Kaulava", "end": "11 Mar 1994 09:51" },
        "rasi": { "name": "Taurus" },
        "advanced_details": {
            "sun_rise": "06:34:12", "sun_set": "18:29:40",
            "moon_rise": "10:12:01", "moon_set": "23:45:10",
            "vaara": "Shukravara",
            "masa": { "amanta_name": "Phalguna", "purnimanta_name": "Chaitra",
                      "alternate_amanta_name": "Masi", "alternate_purnimanta_name": "Panguni",
                      "tamil_month": "Maasi", "ayana": "Uttarayana",
                      "paksha": "Shukla Paksha", "ritu": "Vasanta" },
            "years": { "vikram_samvaat": 2050, "saka": 1915, "kali": 5094 }
        },
        "sun_position": { "zodiac": "Aquarius" },
        "moon_position": { "moon_degree": 36.5821 },
        "rahukaal": "10:30 - 12:00",
        "gulika": "07:30 - 09:00",
        "yamakanta": "15:00 - 16:30",
        "ayanamsa": { "name": "Lahiri" }
    })
}

fn kundli() -> Value {
    json!({
        "ascendant_sign": "Leo", "ascendant_nakshatra": "Magha",
        "rasi": "Cancer", "rasi_lord": "Moon",
        "nakshatra": "Pushya", "nakshatra_lord": "Saturn", "nakshatra_pada": 2,
        "sun_sign": "Aquarius", "tithi": "Shashthi", "karana": "Kaulava", "yoga": "Vishkumbha",
        "gana": "Deva", "yoni": "Goat", "vasya": "Jalachara", "nadi": "Madhya",
        "varna": "Brahmin", "paya": "Silver", "tatva": "Water",
        "life_stone": "Ruby", "lucky_stone": "Yellow Sapphire", "fortune_stone": "Red Coral",
        "name_start": "Hu"
    })
}

fn planets() -> Value {
    json!({
        "0": { "name": "As", "full_name": "Ascendant", "zodiac": "Leo", "house": 1, "local_degree": 12.4 },
        "1": { "name": "Su", "full_name": "Sun", "zodiac": "Aquarius", "house": 7, "local_degree": 26.8 },
        "2": { "name": "Mo", "full_name": "Moon", "zodiac": "Cancer", "house": 12, "local_degree": 6.6 },
        "3": { "name": "Ma", "full_name": "Mars", "zodiac": "Capricorn", "house": 6 },
        "4": { "name": "Me", "full_name": "Mercury", "zodiac": "Aquarius", "house": 7 },
        "5": { "name": "Ju", "full_name": "Jupiter", "zodiac": "Libra", "house": 3, "retro": true },
        "6": { "name": "Ve", "full_name": "Venus", "zodiac": "Aquarius", "house": 7 },
        "7": { "name": "Sa", "full_name": "Saturn", "zodiac": "Aquarius", "house": 7 },
        "8": { "name": "Ra", "full_name": "Rahu", "zodiac": "Scorpio", "house": 4 },
        "9": { "name": "Ke", "full_name": "Ketu", "zodiac": "Taurus", "house": 10 },
        "chart": "D1"
    })
}
