use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Longest accepted city name, counted in characters.
pub const MAX_CITY_LEN: usize = 255;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A validated city search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    city: String,
}

impl SearchRequest {
    /// Validate a city name. Surrounding whitespace is trimmed first.
    pub fn new(city: &str) -> Result<Self, ValidationError> {
        let city = city.trim();

        if city.is_empty() {
            return Err(required());
        }

        if city.chars().count() > MAX_CITY_LEN {
            return Err(ValidationError::new(
                "city",
                format!("The city field must not be greater than {MAX_CITY_LEN} characters."),
            ));
        }

        Ok(Self { city: city.to_owned() })
    }

    /// Validate a raw request body, decoded as a form when `content_type` says so
    /// and as JSON otherwise.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Result<Self, ValidationError> {
        let is_form = content_type
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE));

        if is_form { Self::from_form_body(body) } else { Self::from_json_body(body) }
    }

    /// Validate a form-encoded body. The last `city` field wins.
    pub fn from_form_body(body: &[u8]) -> Result<Self, ValidationError> {
        let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();

        match fields.into_iter().rev().find(|(key, _)| key == "city") {
            Some((_, city)) => Self::new(&city),
            None => Err(required()),
        }
    }

    /// Validate a JSON request body.
    ///
    /// An empty, unparseable or non-object body counts as a missing `city`.
    pub fn from_json_body(body: &[u8]) -> Result<Self, ValidationError> {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let city = parsed.as_ref().and_then(|v| v.get("city"));

        match city {
            None | Some(Value::Null) => Err(required()),
            Some(Value::String(s)) => Self::new(s),
            Some(_) => Err(ValidationError::new("city", "The city field must be a string.")),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

fn required() -> ValidationError {
    ValidationError::new("city", "The city field is required.")
}

/// Normalized current weather for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub country: String,
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    pub description: String,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Metres per second.
    pub wind_speed: f64,
    /// Degrees Celsius, rounded.
    pub feels_like: i64,
    pub icon: String,
}

impl WeatherResult {
    /// Fixed payload served when the upstream call cannot be completed.
    pub fn demo(city: &str) -> Self {
        Self {
            city: city.to_owned(),
            country: "Demo".to_string(),
            temperature: 25,
            description: "Partly cloudy".to_string(),
            humidity: 65,
            wind_speed: 5.2,
            feels_like: 27,
            icon: "02d".to_string(),
        }
    }
}

/// JSON envelope returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WeatherResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn success(data: WeatherResult) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }
}
