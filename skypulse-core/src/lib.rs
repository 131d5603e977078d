//! Core library for the SkyPulse weather screen.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The OpenWeather client and the provider abstraction over it
//! - The screen controller with its derived views
//!
//! It is used by `skypulse-cli`, but can also back other front ends.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod screen;
pub mod views;

pub use config::Config;
pub use error::WeatherError;
pub use location::{Accuracy, Coordinates, LocationService, PermissionStatus, StaticLocation};
pub use model::{ConditionCode, CurrentConditions, ForecastPoint, ForecastSeries};
pub use provider::{LocationQuery, WeatherProvider, openweather::OpenWeatherClient};
pub use screen::{ScreenState, WeatherScreen};
pub use views::IconCategory;
