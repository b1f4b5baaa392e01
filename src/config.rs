use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub astro_api_base: String,
    pub astro_api_key: String,
    pub astro_api_lang: String,
    pub astro_api_timeout_secs: u64,
    pub default_timezone: f64,
    pub login_username: String,
    pub login_password: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub summary_enabled: bool,
    pub llm_provider: String,
    pub llm_model: String,
    pub fallback_provider: String,
    pub fallback_model: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub brand: BrandConfig,
    pub cover_image_path: Option<String>,
    pub report_timeout_secs: u64,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

/// Strings printed on the cover, the author's note and every page footer.
#[derive(Debug, Clone)]
pub struct BrandConfig {
    pub name: String,
    pub services: String,
    pub contact: String,
    pub website: String,
    pub author: String,
}

const DEV_JWT_SECRET: &str = "cosmic-report-dev-secret";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = var("ENVIRONMENT", "development");

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if environment == "production" => bail!("JWT_SECRET must be set in production"),
            _ => DEV_JWT_SECRET.to_string(),
        };

        Ok(Self {
            port: parse_var(&lookup, "APP_PORT", 8080)?,
            astro_api_base: var("ASTRO_API_BASE", "https://api.vedicastroapi.com/v3-json")
                .trim_end_matches('/')
                .to_string(),
            astro_api_key: var("ASTRO_API_KEY", ""),
            astro_api_lang: var("ASTRO_API_LANG", "en"),
            astro_api_timeout_secs: parse_var(&lookup, "ASTRO_API_TIMEOUT_SECS", 30)?,
            default_timezone: parse_var(&lookup, "DEFAULT_TIMEZONE", 5.5)?,
            login_username: var("LOGIN_USERNAME", "astro"),
            login_password: var("LOGIN_PASSWORD", "cosmic"),
            jwt_secret,
            jwt_expires_in_hours: parse_var(&lookup, "JWT_EXPIRES_IN_HOURS", 12)?,
            summary_enabled: parse_var(&lookup, "SUMMARY_ENABLED", false)?,
            llm_provider: var("LLM_PROVIDER", "openai"),
            llm_model: var("LLM_MODEL", "gpt-4o-mini"),
            fallback_provider: var("FALLBACK_PROVIDER", "none"),
            fallback_model: var("FALLBACK_MODEL", "claude-haiku-4-5-20251001"),
            openai_api_key: lookup("OPENAI_API_KEY"),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY"),
            brand: BrandConfig {
                name: var("BRAND_NAME", "Cosmic Code Astrology"),
                services: var(
                    "BRAND_SERVICES",
                    "Vedic Astrology | Numerology | Vastu | Face Reading",
                ),
                contact: var("BRAND_CONTACT", "hello@cosmiccode.example"),
                website: var("BRAND_WEBSITE", "www.cosmiccode.example"),
                author: var("AUTHOR_NAME", "Your Astrologer"),
            },
            cover_image_path: lookup("COVER_IMAGE_PATH").filter(|p| !p.is_empty()),
            report_timeout_secs: parse_var(&lookup, "REPORT_TIMEOUT_SECS", 300)?,
            otel_service_name: var("OTEL_SERVICE_NAME", "cosmic-report"),
            otel_exporter_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid value, got {raw:?}")),
        None => Ok(default),
    }
}
