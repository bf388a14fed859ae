pub use reqwest::StatusCode;

/// Errors surfaced by the weather client and the payload mapper.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to fetch weather data: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to fetch weather data: server responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to fetch weather data: invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed weather payload: expected a JSON object, got {0}")]
    MalformedPayload(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl WeatherError {
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { .. } | Self::Decode(_))
    }
}
