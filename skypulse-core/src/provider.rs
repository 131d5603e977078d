use crate::{
    Config,
    error::WeatherError,
    model::{CurrentConditions, ForecastSeries},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::{self, Debug};

pub mod openweather;

/// Where to look the weather up.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Query parameters identifying the location (`q` or `lat`/`lon`).
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

/// Access to a weather provider. Calls are independent: no caching, no retries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// `false` when no API key is available; every fetch then fails with
    /// [`WeatherError::Configuration`] without touching the network.
    fn is_configured(&self) -> bool;

    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError>;

    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastSeries, WeatherError>;

    async fn fetch_current_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        self.current(&LocationQuery::City(city.to_string())).await
    }

    async fn fetch_current_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        self.current(&LocationQuery::Coordinates { lat, lon }).await
    }

    async fn fetch_forecast_by_city(&self, city: &str) -> Result<ForecastSeries, WeatherError> {
        self.forecast(&LocationQuery::City(city.to_string())).await
    }

    async fn fetch_forecast_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ForecastSeries, WeatherError> {
        let query = LocationQuery::Coordinates { lat, lon };
        self.forecast(&query).await
    }
}

/// Construct the OpenWeather client from config. A missing key yields a
/// disabled client rather than an error.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenWeatherClient::from_config(config))
}
