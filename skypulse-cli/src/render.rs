//! Plain-text rendering of the weather screen.

use chrono::Local;
use skypulse_core::{
    ForecastPoint, ScreenState,
    views::{icon_category, wind_speed_kmh},
};

fn degrees(celsius: f64) -> i64 {
    celsius.round() as i64
}

fn local_time(point: &ForecastPoint, format: &str) -> String {
    point
        .time()
        .map(|t| t.with_timezone(&Local).format(format).to_string())
        .unwrap_or_else(|| "--".to_string())
}

pub fn render(state: &ScreenState) -> String {
    let Some(current) = &state.current else {
        return "No weather data.\n".to_string();
    };

    let mut out = String::new();
    let description = current
        .primary_condition()
        .map_or("", |c| c.description.as_str());

    out.push_str(&format!("{}\n", current.location_name));
    out.push_str(&format!(
        "{}°  {}  [{}]\n",
        degrees(current.temperature_celsius),
        description,
        state.current_icon().icon_name()
    ));
    out.push_str(&format!(
        "Wind {} km/h   Humidity {}%   Rain {}%\n",
        wind_speed_kmh(current.wind_speed_meters_per_second),
        current.humidity_percent,
        state.precipitation_chance_percent()
    ));

    let hours = state.next_hours();
    if !hours.is_empty() {
        out.push_str("\nNext hours\n");
        for point in hours {
            out.push_str(&format!(
                "  {}  {:>4}°  {}\n",
                local_time(point, "%H:%M"),
                degrees(point.temperature_max),
                icon_category(&point.conditions).icon_name()
            ));
        }
    }

    let days = state.daily_summary();
    if !days.is_empty() {
        out.push_str("\n7 days\n");
        for point in days {
            out.push_str(&format!(
                "  {:<4} {:>4}°/{}°  {}\n",
                local_time(point, "%a"),
                degrees(point.temperature_max),
                degrees(point.temperature_min),
                icon_category(&point.conditions).icon_name()
            ));
        }
    }

    out
}
