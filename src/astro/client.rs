use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use serde_json::Value;
use tracing::{Span, instrument};

use super::{ApiRequest, AstroError, AstroSource};
use crate::config::Config;
use crate::telemetry::{ASTRO_API_CALLS, ASTRO_API_DURATION, ASTRO_API_ERRORS};

/// `reqwest`-backed [`AstroSource`]. Calls are made one at a time by the
/// caller and are never retried.
#[derive(Clone)]
pub struct AstroClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    lang: String,
}

impl AstroClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.astro_api_timeout_secs))
            .user_agent(concat!("cosmic-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(
            http,
            &config.astro_api_base,
            &config.astro_api_key,
            &config.astro_api_lang,
        ))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, api_key: &str, lang: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            lang: lang.to_string(),
        }
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}/{}", self.base_url, request.endpoint.path())
    }

    #[instrument(
        name = "astro.call",
        skip(self, request),
        fields(
            astro.endpoint = request.endpoint.path(),
            http.response.status_code = tracing::field::Empty,
            astro.duration_ms = tracing::field::Empty,
        )
    )]
    async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, AstroError> {
        let attrs = [KeyValue::new("astro.endpoint", request.endpoint.path())];
        ASTRO_API_CALLS.add(1, &attrs);

        let start = Instant::now();
        let result = self
            .http
            .get(self.url(request))
            .query(&request.query_pairs(&self.api_key, &self.lang))
            .send()
            .await;

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        ASTRO_API_DURATION.record(duration_ms, &attrs);

        let span = Span::current();
        span.record("astro.duration_ms", duration_ms);

        let response = result.map_err(|source| {
            ASTRO_API_ERRORS.add(1, &attrs);
            tracing::warn!(error = %source, "Astrology API request failed");
            AstroError::Transport {
                label: request.label(),
                source,
            }
        })?;

        let status = response.status();
        span.record("http.response.status_code", status.as_u16() as i64);

        if !status.is_success() {
            ASTRO_API_ERRORS.add(1, &attrs);
            tracing::warn!(status = status.as_u16(), "Astrology API returned an error status");
            return Err(AstroError::Status {
                label: request.label(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl AstroSource for AstroClient {
    async fn fetch_json(&self, request: &ApiRequest) -> Result<Value, AstroError> {
        self.send(request)
            .await?
            .json::<Value>()
            .await
            .map_err(|e| AstroError::Decode {
                label: request.label(),
                reason: e.to_string(),
            })
    }

    async fn fetch_text(&self, request: &ApiRequest) -> Result<String, AstroError> {
        self.send(request)
            .await?
            .text()
            .await
            .map_err(|source| AstroError::Transport {
                label: request.label(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::{BirthQuery, Endpoint};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_url_joins_base_and_path() {
        let client = AstroClient::with_http(
            reqwest::Client::new(),
            "https://api.vedicastroapi.com/v3-json/",
            "key",
            "en",
        );
        let birth = BirthQuery {
            date: NaiveDate::from_ymd_opt(1994, 3, 11).unwrap(),
            time: NaiveTime::from_hms_opt(5, 20, 0).unwrap(),
            latitude: 11.2,
            longitude: 77.0,
            timezone: 5.5,
        };
        let request = ApiRequest::new(Endpoint::MahaDasha, &birth);
        assert_eq!(
            client.url(&request),
            "https://api.vedicastroapi.com/v3-json/dashas/maha-dasha"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let client = AstroClient::with_http(
            reqwest::Client::builder()
                .timeout(Duration::from_millis(500))
                .build()
                .unwrap(),
            "http://127.0.0.1:9",
            "key",
            "en",
        );
        let birth = BirthQuery {
            date: NaiveDate::from_ymd_opt(1994, 3, 11).unwrap(),
            time: NaiveTime::from_hms_opt(5, 20, 0).unwrap(),
            latitude: 11.2,
            longitude: 77.0,
            timezone: 5.5,
        };
        let err = client
            .fetch_json(&ApiRequest::new(Endpoint::Panchang, &birth))
            .await
            .unwrap_err();
        assert!(matches!(err, AstroError::Transport { .. }));
        assert!(err.to_string().starts_with("Failed to fetch Panchang data"));
    }
}
