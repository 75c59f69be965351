use std::env;

use thiserror::Error;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_WEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set; export it before starting the proxy")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Immutable process configuration, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub chat_timeout_ms: u64,
    pub weather_api_key: String,
    pub weather_api_base: String,
    pub weather_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", var("PORT"), 5000)?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_api_base: trim_base(var("GEMINI_API_BASE"), DEFAULT_GEMINI_API_BASE),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            chat_timeout_ms: parse_or("CHAT_TIMEOUT_MS", var("CHAT_TIMEOUT_MS"), 30_000)?,
            weather_api_key: required("WEATHER_API_KEY")?,
            weather_api_base: trim_base(var("WEATHER_API_BASE"), DEFAULT_WEATHER_API_BASE),
            weather_timeout_ms: parse_or("WEATHER_TIMEOUT_MS", var("WEATHER_TIMEOUT_MS"), 10_000)?,
        })
    }

    pub fn gemini_endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.gemini_api_base, self.gemini_model
        )
    }

    pub fn weather_endpoint(&self) -> String {
        format!("{}/weather", self.weather_api_base)
    }
}

// Keys stay out of Debug output so the config can be logged safely.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("gemini_model", &self.gemini_model)
            .field("chat_timeout_ms", &self.chat_timeout_ms)
            .field("weather_api_base", &self.weather_api_base)
            .field("weather_timeout_ms", &self.weather_timeout_ms)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn trim_base(raw: Option<String>, default: &str) -> String {
    raw.as_deref()
        .unwrap_or(default)
        .trim()
        .trim_end_matches('/')
        .to_string()
}
