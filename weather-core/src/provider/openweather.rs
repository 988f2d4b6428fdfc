use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::ProviderError,
    model::WeatherResult,
    provider::{capitalize_first, truncate_body},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Whole-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Current-weather client for the OpenWeatherMap API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherResult, ProviderError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, city, "OpenWeather current weather response");

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Malformed(format!("{e}; body: {}", truncate_body(&body)))
        })?;

        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, ProviderError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("empty `weather` list".to_string()))?;

        Ok(WeatherResult {
            city: self.name,
            country: self.sys.country,
            temperature: self.main.temp.round() as i64,
            description: capitalize_first(&condition.description),
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            feels_like: self.main.feels_like.round() as i64,
            icon: condition.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, ProviderError> {
        self.fetch_current(city).await
    }
}
