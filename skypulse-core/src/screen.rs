//! Screen controller: decides what to fetch and holds the resulting state.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::WeatherError,
    location::{Accuracy, LocationService, PermissionStatus},
    model::{CurrentConditions, ForecastPoint, ForecastSeries},
    provider::WeatherProvider,
    views::{self, IconCategory},
};

pub const MISSING_CONFIGURATION: &str = "missing configuration";
pub const LOCATION_FALLBACK: &str = "Enable location services and try again";
pub const CITY_FALLBACK: &str = "Failed to fetch weather";

/// State rendered by the weather screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreenState {
    pub city_input: String,
    pub current: Option<CurrentConditions>,
    pub forecast: ForecastSeries,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl ScreenState {
    pub fn next_hours(&self) -> &[ForecastPoint] {
        views::next_hours(&self.forecast)
    }

    pub fn daily_summary(&self) -> Vec<&ForecastPoint> {
        views::daily_summary(&self.forecast)
    }

    pub fn current_icon(&self) -> IconCategory {
        let conditions = self
            .current
            .as_ref()
            .map(|c| c.conditions.as_slice())
            .unwrap_or_default();
        views::icon_category(conditions)
    }

    pub fn precipitation_chance_percent(&self) -> i64 {
        views::precipitation_chance_percent(&self.forecast)
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ScreenState,
    /// Bumped by every fetch; only the latest one may write to `state`.
    generation: u64,
}

#[derive(Debug)]
pub struct WeatherScreen {
    provider: Box<dyn WeatherProvider>,
    location: Box<dyn LocationService>,
    inner: Mutex<Inner>,
}

/// Clears the loading flag when a fetch ends, however it ends.
struct LoadingGuard<'a> {
    screen: &'a WeatherScreen,
    token: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.screen
            .commit(self.token, |state| state.is_loading = false);
    }
}

impl WeatherScreen {
    pub fn new(provider: Box<dyn WeatherProvider>, location: Box<dyn LocationService>) -> Self {
        Self {
            provider,
            location,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ScreenState {
        self.inner.lock().state.clone()
    }

    pub fn set_city_input(&self, city: impl Into<String>) {
        self.inner.lock().state.city_input = city.into();
    }

    /// Startup: report missing configuration, otherwise fetch by location.
    pub async fn start(&self) {
        if !self.provider.is_configured() {
            warn!("no API key configured, skipping startup fetch");
            self.inner.lock().state.last_error = Some(MISSING_CONFIGURATION.to_string());
            return;
        }

        self.fetch_by_location().await;
    }

    pub async fn fetch_by_location(&self) {
        let guard = self.begin();
        info!("fetching weather for device location");

        let result = self.location_flow(guard.token).await;
        self.record(guard.token, result, LOCATION_FALLBACK);
    }

    /// Fetch for the typed city.
    ///
    /// The input is trimmed before use and the trimmed value is what gets
    /// sent to the provider. `city_input` itself is left as typed. Blank or
    /// whitespace-only input does nothing.
    pub async fn fetch_by_city(&self) {
        let city = self.inner.lock().state.city_input.trim().to_string();
        if city.is_empty() {
            debug!("city input empty, nothing to fetch");
            return;
        }

        let guard = self.begin();
        info!(%city, "fetching weather for city");

        let result = self.city_flow(guard.token, &city).await;
        self.record(guard.token, result, CITY_FALLBACK);
    }

    async fn location_flow(&self, token: u64) -> Result<(), WeatherError> {
        if self.location.request_permission().await == PermissionStatus::Denied {
            return Err(WeatherError::PermissionDenied);
        }

        let position = self.location.current_position(Accuracy::Balanced).await?;

        let current = self
            .provider
            .fetch_current_by_coordinates(position.latitude, position.longitude)
            .await?;
        let applied = self.commit(token, |state| {
            state.city_input = current.location_name.clone();
            state.current = Some(current);
        });
        if !applied {
            return Ok(());
        }

        let forecast = self
            .provider
            .fetch_forecast_by_coordinates(position.latitude, position.longitude)
            .await?;
        self.commit(token, |state| state.forecast = forecast);

        Ok(())
    }

    async fn city_flow(&self, token: u64, city: &str) -> Result<(), WeatherError> {
        let current = self.provider.fetch_current_by_city(city).await?;
        if !self.commit(token, |state| state.current = Some(current)) {
            return Ok(());
        }

        let forecast = self.provider.fetch_forecast_by_city(city).await?;
        self.commit(token, |state| state.forecast = forecast);

        Ok(())
    }

    /// Start a new fetch: supersede any earlier one and clear stale data.
    fn begin(&self) -> LoadingGuard<'_> {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state.current = None;
        inner.state.last_error = None;
        inner.state.is_loading = true;

        LoadingGuard {
            screen: self,
            token: inner.generation,
        }
    }

    /// Apply `update` only if `token` still belongs to the latest fetch.
    fn commit(&self, token: u64, update: impl FnOnce(&mut ScreenState)) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != token {
            debug!(
                token,
                latest = inner.generation,
                "discarding superseded fetch result"
            );
            return false;
        }
        update(&mut inner.state);
        true
    }

    fn record(&self, token: u64, result: Result<(), WeatherError>, fallback: &str) {
        if let Err(err) = result {
            warn!(error = %err, "weather fetch failed");
            let message = err.user_message(fallback);
            self.commit(token, |state| state.last_error = Some(message));
        }
    }
}
