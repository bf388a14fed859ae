use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::WeatherError;

/// Placeholder shown for fields the payload does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Request body sent to the weather endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WeatherRequest {
    pub city: String,
}

/// `matched_location` group of the payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub display_context: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub iana_time_zone: Option<String>,
}

/// `current_observation` group of the payload.
///
/// Every field is optional; a value of the wrong JSON type is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Observation {
    #[serde(deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub temperature_feels_like: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub relative_humidity: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub uv_index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub uv_description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub visibility: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub wind_direction_cardinal: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub pressure_mean_sea_level: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub pressure_tendency_trend: Option<String>,
    #[serde(rename = "temperatureMax24Hour", deserialize_with = "lenient")]
    pub temperature_max_24_hour: Option<f64>,
    #[serde(rename = "temperatureMin24Hour", deserialize_with = "lenient")]
    pub temperature_min_24_hour: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub temperature_dew_point: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub wx_phrase_long: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sunrise_time_local: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sunset_time_local: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub day_or_night: Option<String>,
}

impl Observation {
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(0.0)
    }

    pub fn feels_like(&self) -> f64 {
        self.temperature_feels_like.unwrap_or_else(|| self.temperature())
    }

    pub fn humidity(&self) -> f64 {
        self.relative_humidity.unwrap_or(0.0)
    }

    pub fn uv_index(&self) -> f64 {
        self.uv_index.unwrap_or(0.0)
    }

    pub fn uv_description(&self) -> &str {
        self.uv_description.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn visibility(&self) -> f64 {
        self.visibility.unwrap_or(0.0)
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed.unwrap_or(0.0)
    }

    pub fn wind_direction(&self) -> &str {
        self.wind_direction_cardinal.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn pressure(&self) -> f64 {
        self.pressure_mean_sea_level.unwrap_or(0.0)
    }

    pub fn pressure_trend(&self) -> &str {
        self.pressure_tendency_trend.as_deref().unwrap_or("Steady")
    }

    pub fn condition(&self) -> &str {
        self.wx_phrase_long.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn sunrise(&self) -> &str {
        self.sunrise_time_local.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn sunset(&self) -> &str {
        self.sunset_time_local.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_daytime(&self) -> bool {
        self.day_or_night.as_deref().unwrap_or("D") == "D"
    }
}

/// Field groups of a data payload, each defaulted when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherData {
    pub location: Location,
    pub observation: Observation,
    pub summary: Option<String>,
}

/// Outcome of inspecting a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadClass {
    /// The service reported a failure; carries its message.
    Error(String),
    Data(WeatherData),
}

/// Split a raw payload into an error report or extracted field groups.
///
/// `error`/`message` keys are checked before anything else is read. Only a
/// top-level value that is not an object is rejected.
pub fn classify_payload(payload: &Value) -> Result<PayloadClass, WeatherError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| WeatherError::MalformedPayload(json_kind(payload)))?;

    if obj.contains_key("error") || obj.contains_key("message") {
        return Ok(PayloadClass::Error(error_message(obj)));
    }

    let summary = obj
        .get("weather_summary")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    Ok(PayloadClass::Data(WeatherData {
        location: group(obj, "matched_location"),
        observation: group(obj, "current_observation"),
        summary,
    }))
}

fn error_message(obj: &Map<String, Value>) -> String {
    [obj.get("error"), obj.get("message")]
        .into_iter()
        .flatten()
        .filter(|v| !is_blank(v))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .next()
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// `null`, `false`, zero and empty values carry no message.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn group<T: DeserializeOwned + Default>(obj: &Map<String, Value>, key: &str) -> T {
    match obj.get(key) {
        Some(v @ Value::Object(_)) => T::deserialize(v).unwrap_or_default(),
        _ => T::default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deserialize a field, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}
