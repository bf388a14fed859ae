//! Core library for the `weather` terminal client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather client abstraction and its HTTP implementation
//! - Payload classification and the presentation mapper
//! - Formatting rules (color bands, bars, time slicing)
//!
//! It is used by `weather-cli`, but holds no terminal I/O of its own.

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod present;

pub use client::{HttpWeatherClient, WeatherClient};
pub use config::{Config, Endpoint};
pub use error::WeatherError;
pub use format::ColorTag;
pub use model::{PayloadClass, WeatherData, classify_payload};
pub use present::{DisplaySection, Presentation, Row, SectionKind, present};
