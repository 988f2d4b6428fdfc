//! City weather lookup: one validated request, one upstream call.

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::Config,
    error::ProviderError,
    model::{SearchRequest, SearchResponse, WeatherResult},
    provider::{WeatherProvider, openweather::OpenWeatherProvider},
};

pub const CITY_NOT_FOUND: &str = "City not found";

/// What a lookup produced, before it is turned into an HTTP reply.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Upstream resolved the city.
    Found(WeatherResult),
    /// Upstream answered with a non-success status.
    NotFound,
    /// Upstream could not be reached or decoded; demo data stands in.
    Fallback(WeatherResult),
}

impl SearchOutcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchOutcome::NotFound)
    }

    pub fn into_response(self) -> SearchResponse {
        match self {
            SearchOutcome::Found(data) | SearchOutcome::Fallback(data) => {
                SearchResponse::success(data)
            }
            SearchOutcome::NotFound => SearchResponse::failure(CITY_NOT_FOUND),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherLookup {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherLookup {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Build a lookup backed by OpenWeatherMap, with the key resolved from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let provider = OpenWeatherProvider::new(
            config.api_key(),
            config.openweather.base_url.clone(),
            config.openweather.request_timeout(),
        )?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let city = request.city();

        match self.provider.current_weather(city).await {
            Ok(result) => {
                info!(city, country = %result.country, "weather lookup succeeded");
                SearchOutcome::Found(result)
            }
            Err(ProviderError::Status { status, body }) => {
                info!(city, status, body = %body, "upstream did not resolve city");
                SearchOutcome::NotFound
            }
            Err(err) => {
                // Transport and decoding failures are answered with demo data.
                warn!(city, error = %err, "weather lookup failed, serving demo data");
                SearchOutcome::Fallback(WeatherResult::demo(city))
            }
        }
    }
}
