use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};

use crate::{config::Endpoint, error::WeatherError, model::WeatherRequest};

/// Header carrying the static API credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A source of raw weather payloads, one request per call.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<Value, WeatherError>;
}

/// Posts `{"city": ...}` to a single configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    api_url: String,
    api_key: String,
    http: Client,
}

impl HttpWeatherClient {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Client(e.to_string()))?;

        Ok(Self {
            api_url: endpoint.api_url,
            api_key: endpoint.api_key,
            http,
        })
    }
}

#[async_trait]
impl WeatherClient for HttpWeatherClient {
    async fn fetch(&self, city: &str) -> Result<Value, WeatherError> {
        tracing::debug!(city, url = %self.api_url, "requesting weather");

        let res = self
            .http
            .post(&self.api_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&WeatherRequest { city: city.to_string() })
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "weather request failed"))?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "weather endpoint returned an error status");
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let payload: Value = serde_json::from_str(&body)?;
        tracing::debug!(%status, bytes = body.len(), "weather payload received");

        Ok(payload)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
