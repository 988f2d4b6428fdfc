//! Core library for the weather search service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Search input validation and the response envelope
//! - Abstraction over weather providers, with an OpenWeatherMap client
//! - The lookup service that turns upstream results into replies
//!
//! It is used by `weather-web`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::{ProviderError, ValidationError};
pub use lookup::{SearchOutcome, WeatherLookup};
pub use model::{SearchRequest, SearchResponse, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
