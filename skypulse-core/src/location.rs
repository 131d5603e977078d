//! Device location services consumed by the screen controller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Requested positioning accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    Low,
    #[default]
    Balanced,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    /// Ask for foreground location access.
    async fn request_permission(&self) -> PermissionStatus;

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, WeatherError>;
}

/// Location backed by fixed, optionally configured coordinates.
#[derive(Debug, Clone, Default)]
pub struct StaticLocation {
    coordinates: Option<Coordinates>,
}

impl StaticLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationService for StaticLocation {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates, WeatherError> {
        self.coordinates.ok_or_else(|| {
            WeatherError::PositionUnavailable(
                "No position available; pass --lat and --lon or search by city".to_string(),
            )
        })
    }
}
