/*
 *  weather.rs
 *
 *  phatwx - weather on a pHAT
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use serde_json::{Value, Error as JsonError};
use reqwest::{Client, header};
use std::fmt::{self, Display};
use std::time::Duration;
use log::{debug, info};

use crate::config::WeatherConfig;

/// OpenWeatherMap current conditions endpoint
pub const OPENWEATHERMAP_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

// Custom error type for weather API operations.
#[derive(Debug)]
pub enum WeatherApiError {
    HttpRequestError(reqwest::Error),
    DeserializationError(JsonError),
    ApiKeyError(String),
    ApiError { status: u16, message: String }, // provider said no
    MissingData(String),
}

impl Display for WeatherApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherApiError::HttpRequestError(e) => write!(f, "HTTP request error: {}", e),
            WeatherApiError::DeserializationError(e) => write!(f, "JSON deserialization error: {}", e),
            WeatherApiError::ApiKeyError(msg) => write!(f, "OpenWeatherMap API key required: {}", msg),
            WeatherApiError::ApiError { status, message } => write!(f, "OpenWeatherMap API error {}: {}", status, message),
            WeatherApiError::MissingData(msg) => write!(f, "Missing weather data: {}", msg),
        }
    }
}

impl std::error::Error for WeatherApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeatherApiError::HttpRequestError(e) => Some(e),
            WeatherApiError::DeserializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherApiError {
    fn from(err: reqwest::Error) -> Self {
        WeatherApiError::HttpRequestError(err)
    }
}

impl From<JsonError> for WeatherApiError {
    fn from(err: JsonError) -> Self {
        WeatherApiError::DeserializationError(err)
    }
}

impl WeatherApiError {
    /// True when the payload arrived but did not carry what we need
    pub fn is_malformed(&self) -> bool {
        matches!(self, WeatherApiError::DeserializationError(_) | WeatherApiError::MissingData(_))
    }
}

/// The three values the scene is drawn from, plus a little context for logs
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub pressure: i64,          // hPa
    pub temperature_celsius: f64,
    pub condition_code: i32,
    pub description: Option<String>,
    pub location_name: Option<String>, // as resolved by the provider, logged only
}

impl WeatherReading {
    pub fn new(pressure: i64, temperature_celsius: f64, condition_code: i32) -> Self {
        Self {
            pressure,
            temperature_celsius,
            condition_code,
            description: None,
            location_name: None,
        }
    }

    /// Pull `main.pressure`, `main.temp` and `weather[0].id` out of a current
    /// weather payload.
    pub fn from_json(payload: &Value) -> Result<Self, WeatherApiError> {
        let main = &payload["main"];
        let pressure = main["pressure"]
            .as_i64()
            .ok_or_else(|| WeatherApiError::MissingData("main.pressure".to_string()))?;
        let temperature_celsius = main["temp"]
            .as_f64()
            .ok_or_else(|| WeatherApiError::MissingData("main.temp".to_string()))?;

        let current = &payload["weather"][0];
        let condition_code = current["id"]
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| WeatherApiError::MissingData("weather[0].id".to_string()))?;

        Ok(Self {
            pressure,
            temperature_celsius,
            condition_code,
            description: current["description"].as_str().map(str::to_string),
            location_name: payload["name"].as_str().map(str::to_string),
        })
    }
}

impl Display for WeatherReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.location_name {
            write!(f, "{}: ", name)?;
        }
        write!(f, "{:.2}°C {} hPa code {}", self.temperature_celsius, self.pressure, self.condition_code)?;
        if let Some(desc) = &self.description {
            write!(f, " ({})", desc)?;
        }
        Ok(())
    }
}

/// `"city, country"` as the provider expects it
pub fn location_query(city: &str, country_code: &str) -> String {
    format!("{}, {}", city, country_code)
}

/// Anything that can produce a reading for a location
#[allow(async_fn_in_trait)]
pub trait WeatherProvider {
    async fn fetch(&self, city: &str, country_code: &str) -> Result<WeatherReading, WeatherApiError>;
}

/// OpenWeatherMap client
#[derive(Debug)]
pub struct Weather {
    base_url: String,
    api_key: String,
    client: Client,
}

impl Weather {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherApiError> {

        const VERSION: &'static str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(WeatherApiError::ApiKeyError("no key specified".to_string()))?;

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Weather {
            base_url: config.base_url().to_string(),
            api_key,
            client,
        })
    }
}

impl WeatherProvider for Weather {
    async fn fetch(&self, city: &str, country_code: &str) -> Result<WeatherReading, WeatherApiError> {
        let location = location_query(city, country_code);
        info!("Fetching current weather for {}", location);
        debug!("GET {}?q={}&units=metric", self.base_url, location);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", location.as_str()), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // error bodies look like {"cod":"404","message":"city not found"}
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("no reason").to_string());
            return Err(WeatherApiError::ApiError { status: status.as_u16(), message });
        }

        let payload: Value = serde_json::from_str(&body)?;
        let reading = WeatherReading::from_json(&payload)?;
        info!("Weather: {}", reading);
        Ok(reading)
    }
}
