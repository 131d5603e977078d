use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider classification of the weather at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionCode {
    pub id: i64,
    /// Coarse category such as "Rain" or "Clear".
    pub category: String,
    /// Localized free text.
    pub description: String,
    pub icon: Option<String>,
}

/// Current-weather snapshot for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_celsius: f64,
    pub humidity_percent: u8,
    pub wind_speed_meters_per_second: f64,
    /// Never empty; only the first entry is used for display.
    pub conditions: Vec<ConditionCode>,
}

impl CurrentConditions {
    pub fn primary_condition(&self) -> Option<&ConditionCode> {
        self.conditions.first()
    }
}

/// One entry of the 3-hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp_seconds: i64,
    pub temperature_celsius: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_percent: u8,
    /// Probability of precipitation in `0.0..=1.0`.
    pub precipitation_probability: f64,
    pub wind_speed_meters_per_second: f64,
    pub conditions: Vec<ConditionCode>,
}

impl ForecastPoint {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp_seconds, 0)
    }
}

/// Forecast points in provider order, ascending by timestamp.
pub type ForecastSeries = Vec<ForecastPoint>;
