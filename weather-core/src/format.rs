//! Formatting rules: color bands, bar ratios, time slicing and trend icons.
//!
//! Everything here is a pure function of its arguments.

use chrono::DateTime;

use crate::model::NOT_AVAILABLE;

/// Abstract color hint attached to rendered values.
///
/// The renderer decides the concrete terminal color; `Orange` and `Red` are
/// always kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    BrightBlue,
    BrightCyan,
    BrightWhite,
    Blue,
    Cyan,
    Green,
    Yellow,
    Orange,
    Red,
    Magenta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    VeryCold,
    Cold,
    Mild,
    Warm,
    Hot,
}

/// Upper bounds (exclusive) checked top-down; the last band catches the rest.
const TEMPERATURE_BANDS: &[(f64, TemperatureBand)] = &[
    (0.0, TemperatureBand::VeryCold),
    (10.0, TemperatureBand::Cold),
    (20.0, TemperatureBand::Mild),
    (30.0, TemperatureBand::Warm),
];

impl TemperatureBand {
    pub fn classify(celsius: f64) -> Self {
        lookup(TEMPERATURE_BANDS, celsius, Self::Hot)
    }

    pub fn color(self) -> ColorTag {
        match self {
            Self::VeryCold => ColorTag::BrightBlue,
            Self::Cold => ColorTag::Cyan,
            Self::Mild => ColorTag::Green,
            Self::Warm => ColorTag::Yellow,
            Self::Hot => ColorTag::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvBand {
    Low,
    Moderate,
    High,
    Extreme,
}

const UV_BANDS: &[(f64, UvBand)] = &[
    (3.0, UvBand::Low),
    (6.0, UvBand::Moderate),
    (8.0, UvBand::High),
];

impl UvBand {
    pub fn classify(uv: f64) -> Self {
        lookup(UV_BANDS, uv, Self::Extreme)
    }

    pub fn color(self) -> ColorTag {
        match self {
            Self::Low => ColorTag::Green,
            Self::Moderate => ColorTag::Yellow,
            Self::High => ColorTag::Orange,
            Self::Extreme => ColorTag::Red,
        }
    }
}

fn lookup<B: Copy>(table: &[(f64, B)], value: f64, top: B) -> B {
    table
        .iter()
        .find(|(upper, _)| value < *upper)
        .map_or(top, |(_, band)| *band)
}

pub fn color_for_temperature(celsius: f64) -> ColorTag {
    TemperatureBand::classify(celsius).color()
}

pub fn color_for_uv_index(uv: f64) -> ColorTag {
    UvBand::classify(uv).color()
}

/// `value / max` clamped to `[0, 1]`; a non-positive `max` gives 0.
pub fn progress_ratio(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() || !value.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// Fixed-width bar of `█` (filled) and `░` (empty) cells.
pub fn render_bar(ratio: f64, width: usize) -> String {
    let filled = filled_cells(ratio, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn filled_cells(ratio: f64, width: usize) -> usize {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    ((ratio * width as f64) as usize).min(width)
}

/// Position of `current` inside the 24h range, or `None` when either bound is
/// missing. The bounds are taken as given, so an inverted range still yields
/// a position; only a zero span gives 0.
pub fn temperature_range_ratio(current: f64, min: Option<f64>, max: Option<f64>) -> Option<f64> {
    let (min, max) = (min?, max?);
    let span = max - min;
    if span == 0.0 || !span.is_finite() || !current.is_finite() {
        return Some(0.0);
    }
    Some(((current - min) / span).clamp(0.0, 1.0))
}

/// `HH:MM` part of a local timestamp such as `2024-01-01T06:15:00+0000`.
pub fn format_time_of_day(timestamp: &str) -> String {
    if timestamp == NOT_AVAILABLE {
        return timestamp.to_string();
    }

    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .or_else(|_| DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%z"));
    if let Ok(dt) = parsed {
        return dt.format("%H:%M").to_string();
    }

    match timestamp.split_once('T') {
        Some((_, time)) => time.chars().take(5).collect(),
        None => timestamp.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureTrend {
    Rising,
    Falling,
    Steady,
}

impl PressureTrend {
    /// Matches the upstream vocabulary verbatim; no case folding.
    pub fn from_label(label: &str) -> Self {
        if label.contains("Rising") {
            Self::Rising
        } else if label.contains("Falling") {
            Self::Falling
        } else {
            Self::Steady
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Rising => "📈",
            Self::Falling => "📉",
            Self::Steady => "➡️",
        }
    }
}

/// Integral values print without decimals (`22`), others as-is (`22.5`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Like [`format_number`], with the `N/A` sentinel for missing values.
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_number)
}
