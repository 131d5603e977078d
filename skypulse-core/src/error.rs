use thiserror::Error;

/// Errors produced by the weather client and the location services.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeatherError {
    /// No API key configured; no request is attempted.
    #[error("missing configuration")]
    Configuration,

    /// The user refused foreground location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// Permission was granted but no position could be obtained.
    #[error("{0}")]
    PositionUnavailable(String),

    /// Transport failure before an HTTP response was received.
    #[error("{0}")]
    Network(String),

    /// Non-success status, structured error payload or malformed body.
    #[error("Provider error ({status_code}): {message}")]
    Provider { status_code: u16, message: String },
}

impl WeatherError {
    pub fn provider(status_code: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status_code,
            message: message.into(),
        }
    }

    /// Message shown to the user for a failed fetch flow.
    ///
    /// The provider's own message wins, then the error's display text, then
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Self::Provider { message, .. } = self {
            if !message.trim().is_empty() {
                return message.clone();
            }
            return fallback.to_string();
        }

        let own = self.to_string();
        if own.trim().is_empty() {
            fallback.to_string()
        } else {
            own
        }
    }
}
