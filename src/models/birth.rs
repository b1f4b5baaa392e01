use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::astro::BirthQuery;
use crate::dates::display_date;
use crate::error::AppError;
use crate::lenient;

/// Birth-details form exactly as submitted. Every value arrives as text
/// (coordinates may also be numbers) and is checked by [`BirthForm::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BirthForm {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sex: String,
    #[serde(deserialize_with = "lenient::string")]
    pub dob: String,
    #[serde(deserialize_with = "lenient::string")]
    pub time: String,
    #[serde(deserialize_with = "lenient::string")]
    pub place: String,
    #[serde(deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(deserialize_with = "lenient::string")]
    pub country: String,
    #[serde(deserialize_with = "lenient::string")]
    pub latitude: String,
    #[serde(deserialize_with = "lenient::string")]
    pub longitude: String,
    #[serde(deserialize_with = "lenient::string")]
    pub timezone: String,
}

/// Validated subject of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthDetails {
    pub name: String,
    pub sex: String,
    pub dob: NaiveDate,
    pub time: NaiveTime,
    pub place: String,
    pub state: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: f64,
}

impl BirthForm {
    /// Names of required fields left blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("sex", &self.sex),
            ("dob", &self.dob),
            ("time", &self.time),
            ("place", &self.place),
            ("state", &self.state),
            ("country", &self.country),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn validate(&self, default_timezone: f64) -> Result<BirthDetails, AppError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Please fill in all fields: {}",
                missing.join(", ")
            )));
        }

        let dob = NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!(
                "Invalid date of birth {:?}, expected YYYY-MM-DD",
                self.dob
            ))
        })?;

        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(self.time.trim(), "%H:%M:%S"))
            .map_err(|_| {
                AppError::Validation(format!(
                    "Invalid time of birth {:?}, expected HH:MM",
                    self.time
                ))
            })?;

        let latitude = parse_coordinate("latitude", &self.latitude, 90.0)?;
        let longitude = parse_coordinate("longitude", &self.longitude, 180.0)?;

        let timezone = if self.timezone.trim().is_empty() {
            default_timezone
        } else {
            self.timezone
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|tz| (-12.0..=14.0).contains(tz))
                .ok_or_else(|| {
                    AppError::Validation(format!("Invalid timezone {:?}", self.timezone))
                })?
        };

        Ok(BirthDetails {
            name: self.name.trim().to_string(),
            sex: self.sex.trim().to_string(),
            dob,
            time,
            place: self.place.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            latitude,
            longitude,
            timezone,
        })
    }
}

fn parse_coordinate(field: &str, raw: &str, limit: f64) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= limit)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid {field} {raw:?}, expected a number between -{limit} and {limit}"
            ))
        })
}

impl BirthDetails {
    pub fn query(&self) -> BirthQuery {
        BirthQuery {
            date: self.dob,
            time: self.time,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
        }
    }

    pub fn report_filename(&self) -> String {
        format!("Cosmic_Report_{}.pdf", display_date(self.dob))
    }

    pub fn weekday_name(&self) -> &'static str {
        match self.dob.weekday() {
            chrono::Weekday::Mon => "Monday",
            chrono::Weekday::Tue => "Tuesday",
            chrono::Weekday::Wed => "Wednesday",
            chrono::Weekday::Thu => "Thursday",
            chrono::Weekday::Fri => "Friday",
            chrono::Weekday::Sat => "Saturday",
            chrono::Weekday::Sun => "Sunday",
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_details() -> BirthDetails {
    BirthDetails {
        name: "Asha Rao".to_string(),
        sex: "Female".to_string(),
        dob: NaiveDate::from_ymd_opt(1994, 3, 11).unwrap(),
        time: NaiveTime::from_hms_opt(5, 20, 0).unwrap(),
        place: "Coimbatore".to_string(),
        state: "Tamil Nadu".to_string(),
        country: "India".to_string(),
        latitude: 11.2,
        longitude: 77.0,
        timezone: 5.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_form() -> BirthForm {
        serde_json::from_value(json!({
            "name": "Asha Rao",
            "sex": "Female",
            "dob": "1994-03-11",
            "time": "05:20",
            "place": "Coimbatore",
            "state": "Tamil Nadu",
            "country": "India",
            "latitude": 11.2,
            "longitude": "77.00"
        }))
        .unwrap()
    }

    #[test]
    fn test_complete_form_validates() {
        let details = complete_form().validate(5.5).unwrap();
        assert_eq!(details, sample_details());
        assert_eq!(details.query().timezone, 5.5);
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut form = complete_form();
        form.name = "  ".to_string();
        form.longitude = String::new();
        let err = form.validate(5.5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please fill in all fields: name, longitude"
        );
    }

    #[test]
    fn test_empty_payload_lists_every_field() {
        let form: BirthForm = serde_json::from_value(json!({})).unwrap();
        assert_eq!(form.missing_fields().len(), 9);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut form = complete_form();
        form.latitude = "95".to_string();
        assert!(matches!(form.validate(5.5), Err(AppError::Validation(_))));

        let mut form = complete_form();
        form.longitude = "east".to_string();
        assert!(form.validate(5.5).is_err());
    }

    #[test]
    fn test_bad_date_and_time() {
        let mut form = complete_form();
        form.dob = "11/03/1994".to_string();
        assert!(form.validate(5.5).unwrap_err().to_string().contains("date of birth"));

        let mut form = complete_form();
        form.time = "5 am".to_string();
        assert!(form.validate(5.5).unwrap_err().to_string().contains("time of birth"));
    }

    #[test]
    fn test_explicit_timezone_overrides_default() {
        let mut form = complete_form();
        form.timezone = "-5".to_string();
        assert_eq!(form.validate(5.5).unwrap().timezone, -5.0);

        form.timezone = "20".to_string();
        assert!(form.validate(5.5).is_err());
    }

    #[test]
    fn test_filename_from_dob() {
        assert_eq!(
            sample_details().report_filename(),
            "Cosmic_Report_11-03-1994.pdf"
        );
        assert_eq!(sample_details().weekday_name(), "Friday");
    }
}
