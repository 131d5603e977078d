use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    Config,
    config::{DEFAULT_BASE_URL, DEFAULT_LANG},
    error::WeatherError,
    model::{ConditionCode, CurrentConditions, ForecastPoint, ForecastSeries},
};

use super::{LocationQuery, WeatherProvider};

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    base_url: String,
    lang: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key().map(str::to_owned))
            .with_base_url(config.base_url.clone())
            .with_lang(config.lang.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Issue one GET and return the status and body of a successful response.
    async fn get(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<(u16, String), WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::Configuration)?;
        let url = format!("{}/{endpoint}", self.base_url.trim_end_matches('/'));

        let mut params = query.query_params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));
        params.push(("lang", self.lang.clone()));

        debug!(%url, %query, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                WeatherError::Network(format!(
                    "Failed to reach OpenWeather: {}",
                    e.without_url()
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!(
                "Failed to read OpenWeather response body: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            let code = status.as_u16();
            let message = error_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {code}"));
            warn!(status = code, %message, "OpenWeather request failed");
            return Err(WeatherError::provider(code, message));
        }

        // OpenWeather can report errors inside a 2xx body via `cod`.
        if let Some(code) = payload_code(&body).filter(|c| !(200..300).contains(c)) {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {code}"));
            warn!(code, %message, "OpenWeather returned an error payload");
            return Err(WeatherError::provider(code, message));
        }

        Ok((status.as_u16(), body))
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    #[serde(default)]
    cod: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

/// The provider's `message` field, when it is a non-blank string.
fn error_message(body: &str) -> Option<String> {
    let parsed: OwStatus = serde_json::from_str(body).ok()?;
    match parsed.message? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// `cod` is a number on /weather and a string on /forecast.
fn payload_code(body: &str) -> Option<u16> {
    let parsed: OwStatus = serde_json::from_str(body).ok()?;
    match parsed.cod? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, WeatherError> {
    serde_json::from_str(body).map_err(|e| {
        WeatherError::provider(status, format!("Malformed OpenWeather response: {e}"))
    })
}

fn conditions(status: u16, weather: Vec<OwWeather>) -> Result<Vec<ConditionCode>, WeatherError> {
    if weather.is_empty() {
        return Err(WeatherError::provider(
            status,
            "Malformed OpenWeather response: no weather conditions",
        ));
    }
    Ok(weather.into_iter().map(ConditionCode::from).collect())
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    main: String,
    description: String,
    #[serde(default)]
    icon: Option<String>,
}

impl From<OwWeather> for ConditionCode {
    fn from(w: OwWeather) -> Self {
        ConditionCode {
            id: w.id,
            category: w.main,
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: Option<OwWind>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    #[serde(default)]
    temp: Option<f64>,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: Option<OwWind>,
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self))]
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
        let (status, body) = self.get(CURRENT_ENDPOINT, query).await?;
        let parsed: OwCurrentResponse = parse_body(status, &body)?;

        Ok(CurrentConditions {
            location_name: parsed.name,
            temperature_celsius: parsed.main.temp,
            humidity_percent: parsed.main.humidity,
            wind_speed_meters_per_second: parsed.wind.map_or(0.0, |w| w.speed),
            conditions: conditions(status, parsed.weather)?,
        })
    }

    #[instrument(skip(self))]
    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastSeries, WeatherError> {
        let (status, body) = self.get(FORECAST_ENDPOINT, query).await?;
        let parsed: OwForecastResponse = parse_body(status, &body)?;

        let series = parsed
            .list
            .into_iter()
            .map(|entry| {
                Ok(ForecastPoint {
                    timestamp_seconds: entry.dt,
                    temperature_celsius: entry.main.temp.unwrap_or(entry.main.temp_max),
                    temperature_min: entry.main.temp_min,
                    temperature_max: entry.main.temp_max,
                    humidity_percent: entry.main.humidity,
                    precipitation_probability: entry.pop,
                    wind_speed_meters_per_second: entry.wind.map_or(0.0, |w| w.speed),
                    conditions: conditions(status, entry.weather)?,
                })
            })
            .collect::<Result<ForecastSeries, WeatherError>>()?;

        debug!(points = series.len(), "parsed OpenWeather forecast");
        Ok(series)
    }
}
