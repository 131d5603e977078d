//! Display-ready views derived from fetched weather data.
//!
//! Everything here is a pure function of its input; nothing is cached.

use serde::Serialize;

use crate::model::{ConditionCode, ForecastPoint};

/// Number of 3-hourly entries shown as "next hours".
pub const NEXT_HOURS_LEN: usize = 6;

/// Entries per day at the provider's 3-hour cadence.
const POINTS_PER_DAY: usize = 8;

/// Offset within each 8-entry block used as the day's representative.
const DAILY_SAMPLE_OFFSET: usize = 4;

pub const DAILY_SUMMARY_LEN: usize = 7;

/// The first six forecast entries, or the whole series when it is shorter.
pub fn next_hours(forecast: &[ForecastPoint]) -> &[ForecastPoint] {
    &forecast[..forecast.len().min(NEXT_HOURS_LEN)]
}

/// One entry per day: indices 4, 12, 20, ... capped at seven.
///
/// Sampling follows the series origin ("now"), not calendar days.
pub fn daily_summary(forecast: &[ForecastPoint]) -> Vec<&ForecastPoint> {
    forecast
        .iter()
        .skip(DAILY_SAMPLE_OFFSET)
        .step_by(POINTS_PER_DAY)
        .take(DAILY_SUMMARY_LEN)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Fog,
    Clear,
    Cloudy,
}

impl IconCategory {
    pub fn icon_name(&self) -> &'static str {
        match self {
            IconCategory::Thunderstorm => "weather-lightning",
            IconCategory::Drizzle => "weather-rainy",
            IconCategory::Rain => "weather-pouring",
            IconCategory::Snow => "weather-snowy",
            IconCategory::Fog => "weather-fog",
            IconCategory::Clear => "weather-sunny",
            IconCategory::Cloudy => "weather-cloudy",
        }
    }
}

/// Classify by the first condition's category, case-insensitively.
///
/// Rules are checked in order and the first substring hit wins; drizzle must
/// stay ahead of rain.
pub fn icon_category(conditions: &[ConditionCode]) -> IconCategory {
    let Some(first) = conditions.first() else {
        return IconCategory::Cloudy;
    };
    let category = first.category.to_lowercase();

    const RULES: &[(&[&str], IconCategory)] = &[
        (&["thunder"], IconCategory::Thunderstorm),
        (&["drizzle"], IconCategory::Drizzle),
        (&["rain"], IconCategory::Rain),
        (&["snow"], IconCategory::Snow),
        (&["mist", "fog"], IconCategory::Fog),
        (&["clear"], IconCategory::Clear),
        (&["cloud"], IconCategory::Cloudy),
    ];

    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| category.contains(n)))
        .map_or(IconCategory::Cloudy, |(_, icon)| *icon)
}

/// Wind speed converted from m/s to whole km/h.
pub fn wind_speed_kmh(meters_per_second: f64) -> i64 {
    (meters_per_second * 3.6).round() as i64
}

/// Chance of rain in whole percent for the nearest forecast entry.
pub fn precipitation_chance_percent(forecast: &[ForecastPoint]) -> i64 {
    next_hours(forecast)
        .first()
        .map_or(0, |p| (p.precipitation_probability * 100.0).round() as i64)
}
