//! Payloads of the astrology API, decoded leniently: missing or oddly typed
//! fields fall back to empty values instead of failing the report.

use serde::Deserialize;
use serde_json::Value;

use crate::lenient;

// --- Panchang ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Panchang {
    #[serde(deserialize_with = "lenient::named")]
    pub day: String,
    #[serde(deserialize_with = "lenient::object")]
    pub tithi: Tithi,
    #[serde(deserialize_with = "lenient::object")]
    pub nakshatra: PanchangNakshatra,
    #[serde(deserialize_with = "lenient::object")]
    pub yoga: PanchangYoga,
    #[serde(deserialize_with = "lenient::object")]
    pub karana: PanchangKarana,
    #[serde(deserialize_with = "lenient::named")]
    pub rasi: String,
    #[serde(deserialize_with = "lenient::object")]
    pub advanced_details: AdvancedDetails,
    #[serde(deserialize_with = "lenient::object")]
    pub sun_position: SunPosition,
    #[serde(deserialize_with = "lenient::object")]
    pub moon_position: MoonPosition,
    #[serde(deserialize_with = "lenient::string")]
    pub rahukaal: String,
    #[serde(deserialize_with = "lenient::string")]
    pub gulika: String,
    #[serde(deserialize_with = "lenient::string")]
    pub yamakanta: String,
    #[serde(deserialize_with = "lenient::named")]
    pub ayanamsa: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tithi {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub number: String,
    #[serde(deserialize_with = "lenient::string")]
    pub next_tithi: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub diety: String,
    #[serde(deserialize_with = "lenient::string")]
    pub meaning: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PanchangNakshatra {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PanchangYoga {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::string")]
    pub meaning: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PanchangKarana {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::string")]
    pub special: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdvancedDetails {
    #[serde(deserialize_with = "lenient::string")]
    pub sun_rise: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sun_set: String,
    #[serde(deserialize_with = "lenient::string")]
    pub moon_rise: String,
    #[serde(deserialize_with = "lenient::string")]
    pub moon_set: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vaara: String,
    #[serde(deserialize_with = "lenient::object")]
    pub masa: Masa,
    #[serde(deserialize_with = "lenient::object")]
    pub years: Years,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Masa {
    #[serde(deserialize_with = "lenient::string")]
    pub amanta_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub purnimanta_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub alternate_amanta_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub alternate_purnimanta_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tamil_month: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ayana: String,
    #[serde(deserialize_with = "lenient::string")]
    pub paksha: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ritu: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Years {
    #[serde(deserialize_with = "lenient::string")]
    pub vikram_samvaat: String,
    #[serde(deserialize_with = "lenient::string")]
    pub saka: String,
    #[serde(deserialize_with = "lenient::string")]
    pub kali: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SunPosition {
    #[serde(deserialize_with = "lenient::string")]
    pub zodiac: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoonPosition {
    #[serde(deserialize_with = "lenient::number")]
    pub moon_degree: Option<f64>,
}

/// Sunrise and sunset share one shape; each call fills its own field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SunTimes {
    #[serde(deserialize_with = "lenient::string")]
    pub sun_rise: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sun_set: String,
}

// --- Kundli ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KundliDetails {
    #[serde(deserialize_with = "lenient::string")]
    pub ascendant_sign: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ascendant_nakshatra: String,
    #[serde(deserialize_with = "lenient::string")]
    pub rasi: String,
    #[serde(deserialize_with = "lenient::string")]
    pub rasi_lord: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nakshatra: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nakshatra_lord: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nakshatra_pada: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sun_sign: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tithi: String,
    #[serde(deserialize_with = "lenient::string")]
    pub karana: String,
    #[serde(deserialize_with = "lenient::string")]
    pub yoga: String,
    #[serde(deserialize_with = "lenient::string")]
    pub gana: String,
    #[serde(deserialize_with = "lenient::string")]
    pub yoni: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vasya: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nadi: String,
    #[serde(deserialize_with = "lenient::string")]
    pub varna: String,
    #[serde(deserialize_with = "lenient::string")]
    pub paya: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tatva: String,
    #[serde(deserialize_with = "lenient::string")]
    pub life_stone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lucky_stone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub fortune_stone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name_start: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoonSign {
    #[serde(deserialize_with = "lenient::string")]
    pub moon_sign: String,
    #[serde(deserialize_with = "lenient::string")]
    pub prediction: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SunSign {
    #[serde(deserialize_with = "lenient::string")]
    pub sun_sign: String,
    #[serde(deserialize_with = "lenient::string")]
    pub prediction: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AscendantSign {
    #[serde(deserialize_with = "lenient::string")]
    pub ascendant: String,
    #[serde(deserialize_with = "lenient::string")]
    pub prediction: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AscendantReport {
    #[serde(deserialize_with = "lenient::string")]
    pub ascendant: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ascendant_lord: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ascendant_lord_location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub general_prediction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub personalised_prediction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lucky_gem: String,
    #[serde(deserialize_with = "lenient::string")]
    pub day_for_fasting: String,
    #[serde(deserialize_with = "lenient::string")]
    pub gayatri_mantra: String,
}

// --- Charts ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlanetPosition {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub zodiac: String,
    #[serde(deserialize_with = "lenient::string")]
    pub house: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nakshatra: String,
    #[serde(deserialize_with = "lenient::number")]
    pub local_degree: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub retro: bool,
}

/// Planets of one chart, delivered either as `{ "0": {...}, "1": {...} }`
/// or as an array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PlanetPositions(#[serde(deserialize_with = "lenient::records")] pub Vec<PlanetPosition>);

impl PlanetPositions {
    /// Looks a planet up by its short (`Su`) or full (`Sun`) name.
    pub fn find(&self, name: &str) -> Option<&PlanetPosition> {
        self.0.iter().find(|p| {
            p.name.eq_ignore_ascii_case(name) || p.full_name.eq_ignore_ascii_case(name)
        })
    }

    pub fn zodiac_of(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|p| p.zodiac.as_str())
            .filter(|z| !z.is_empty())
    }
}

// --- Dashas ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MahaDasha {
    #[serde(deserialize_with = "lenient::cells")]
    pub mahadasha: Vec<String>,
    #[serde(deserialize_with = "lenient::cells")]
    pub mahadasha_order: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub dasha_start_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AntarDasha {
    #[serde(deserialize_with = "lenient::number_rows")]
    pub antardashas: Vec<Vec<String>>,
    #[serde(deserialize_with = "lenient::number_rows")]
    pub antardasha_order: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MahaDashaPredictions {
    #[serde(deserialize_with = "lenient::records")]
    pub dashas: Vec<DashaPrediction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashaPrediction {
    #[serde(deserialize_with = "lenient::string")]
    pub dasha: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dasha_start_year: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dasha_end_year: String,
    #[serde(deserialize_with = "lenient::string")]
    pub prediction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub planet_in_zodiac: String,
}

// --- Ashtakvarga & Sade Sati ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ashtakvarga {
    #[serde(deserialize_with = "lenient::cells")]
    pub ashtakvarga_order: Vec<String>,
    #[serde(deserialize_with = "lenient::number_rows")]
    pub ashtakvarga_points: Vec<Vec<String>>,
    #[serde(deserialize_with = "lenient::cells")]
    pub ashtakvarga_total: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SadeSatiPeriod {
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub zodiac: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dhaiya: String,
    #[serde(deserialize_with = "lenient::string")]
    pub direction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub retro: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SadeSatiTable(#[serde(deserialize_with = "lenient::records")] pub Vec<SadeSatiPeriod>);

// --- Doshas ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MangalDosh {
    #[serde(deserialize_with = "lenient::maybe_flag")]
    pub is_dosha_present: Option<bool>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_anshik: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub score: String,
    #[serde(deserialize_with = "lenient::string")]
    pub bot_response: String,
    #[serde(deserialize_with = "lenient::string_map")]
    pub factors: std::collections::BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::object")]
    pub cancellation: Cancellation,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Cancellation {
    #[serde(rename = "cancellationReason", deserialize_with = "lenient::string_list")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ManglikDosh {
    #[serde(deserialize_with = "lenient::maybe_flag")]
    pub is_dosha_present: Option<bool>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub factors: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub aspects: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub bot_response: String,
    #[serde(deserialize_with = "lenient::string")]
    pub score: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KaalsarpDosh {
    #[serde(deserialize_with = "lenient::maybe_flag")]
    pub is_dosha_present: Option<bool>,
    #[serde(deserialize_with = "lenient::string")]
    pub dosha_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dosha_direction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub bot_response: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub remedies: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PitraDosh {
    #[serde(deserialize_with = "lenient::maybe_flag")]
    pub is_dosha_present: Option<bool>,
    #[serde(deserialize_with = "lenient::string")]
    pub bot_response: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub remedies: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub effects: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Papasamaya {
    #[serde(deserialize_with = "lenient::string")]
    pub rahu_papa: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sun_papa: String,
    #[serde(deserialize_with = "lenient::string")]
    pub saturn_papa: String,
    #[serde(deserialize_with = "lenient::string")]
    pub mars_papa: String,
}

/// Dosha flags are tri-state; only an explicit `false` hides a dosha.
pub trait DoshaFlag {
    fn presence(&self) -> Option<bool>;

    fn is_absent(&self) -> bool {
        self.presence() == Some(false)
    }
}

impl DoshaFlag for MangalDosh {
    fn presence(&self) -> Option<bool> {
        self.is_dosha_present
    }
}

impl DoshaFlag for ManglikDosh {
    fn presence(&self) -> Option<bool> {
        self.is_dosha_present
    }
}

impl DoshaFlag for KaalsarpDosh {
    fn presence(&self) -> Option<bool> {
        self.is_dosha_present
    }
}

impl DoshaFlag for PitraDosh {
    fn presence(&self) -> Option<bool> {
        self.is_dosha_present
    }
}

// --- Yogas & strength ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YogaList {
    #[serde(deserialize_with = "lenient::records")]
    pub yogas_list: Vec<Yoga>,
    #[serde(deserialize_with = "lenient::string")]
    pub yogas_count: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Yoga {
    #[serde(deserialize_with = "lenient::string")]
    pub yoga: String,
    #[serde(deserialize_with = "lenient::string")]
    pub meaning: String,
    #[serde(deserialize_with = "lenient::string")]
    pub strength_in_percentage: String,
}

/// Shad bala arrives in several layouts; rows are flattened for display.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ShadBala(pub Value);

impl ShadBala {
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        flatten_rows(String::new(), &self.0, &mut rows);
        rows
    }
}

fn flatten_rows(prefix: String, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let label = if prefix.is_empty() {
                    humanize(key)
                } else {
                    format!("{prefix} / {}", humanize(key))
                };
                flatten_rows(label, child, rows);
            }
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            for (i, child) in items.iter().enumerate() {
                flatten_rows(format!("{prefix} {}", i + 1).trim().to_string(), child, rows);
            }
        }
        other => {
            let text = lenient::text(other);
            if !text.is_empty() {
                rows.push((prefix, text));
            }
        }
    }
}

fn humanize(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// --- Planet narratives ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlanetReport {
    #[serde(deserialize_with = "lenient::string")]
    pub planet_considered: String,
    #[serde(deserialize_with = "lenient::string")]
    pub planet_location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub general_prediction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub personalised_prediction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub planet_definitions: String,
    #[serde(deserialize_with = "lenient::string")]
    pub qualities_short: String,
    #[serde(deserialize_with = "lenient::string")]
    pub qualities_long: String,
    #[serde(deserialize_with = "lenient::string")]
    pub planet_zodiac_prediction: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub character_keywords_positive: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub character_keywords_negative: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub gayatri_mantra: String,
}

/// Chara karakas keyed by role (`Atma`, `Amatya`, `Dara`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct JaiminiKarakas(pub Value);

impl JaiminiKarakas {
    /// Planet holding the karaka whose role name starts with `role`
    /// (case-insensitive), e.g. `"dara"` matches `Dara` and `Darakaraka`.
    pub fn planet_for(&self, role: &str) -> Option<String> {
        let role = role.to_ascii_lowercase();
        let matches = |key: &str| key.to_ascii_lowercase().starts_with(&role);

        let planet_of = |value: &Value| match value {
            Value::Object(map) => map.get("planet").map(lenient::text),
            other => Some(lenient::text(other)),
        };

        let found = match &self.0 {
            Value::Object(map) => map
                .iter()
                .find(|(key, _)| matches(key))
                .and_then(|(_, value)| planet_of(value)),
            Value::Array(items) => items.iter().find_map(|item| {
                let karaka = item.get("karaka").map(lenient::text)?;
                if matches(&karaka) { planet_of(item) } else { None }
            }),
            _ => None,
        };
        found.filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HouseCharacteristic {
    #[serde(deserialize_with = "lenient::string")]
    pub current_house: String,
    #[serde(deserialize_with = "lenient::string")]
    pub verbal_location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub current_zodiac: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lord_of_zodiac: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lord_zodiac_location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lord_house_location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub personalised_prediction: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lord_strength: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PersonalCharacteristics(
    #[serde(deserialize_with = "lenient::records")] pub Vec<HouseCharacteristic>,
);

impl PersonalCharacteristics {
    /// The first-house reading, or the first entry when houses are unlabelled.
    pub fn ascendant_house(&self) -> Option<&HouseCharacteristic> {
        self.0
            .iter()
            .find(|h| h.current_house == "1")
            .or_else(|| self.0.first())
    }
}

/// Occupants per house; layouts differ between API versions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PlanetsInHouses(pub Value);

impl PlanetsInHouses {
    pub fn occupants(&self, house: u8) -> Vec<String> {
        let key = house.to_string();
        let entry = match &self.0 {
            Value::Object(map) => map.get(&key).cloned(),
            Value::Array(items) => items
                .iter()
                .find(|item| item.get("house").map(lenient::text).as_deref() == Some(key.as_str()))
                .cloned()
                .or_else(|| items.get(usize::from(house).saturating_sub(1)).cloned()),
            _ => None,
        };

        let planets = match entry {
            Some(Value::Object(map)) => map.get("planets").cloned().unwrap_or(Value::Null),
            Some(other) => other,
            None => Value::Null,
        };

        match planets {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => map
                        .get("full_name")
                        .or_else(|| map.get("name"))
                        .map(lenient::text)
                        .unwrap_or_default(),
                    other => lenient::text(other),
                })
                .filter(|name| !name.is_empty())
                .collect(),
            other => {
                let text = lenient::text(&other);
                if text.is_empty() { Vec::new() } else { vec![text] }
            }
        }
    }
}
