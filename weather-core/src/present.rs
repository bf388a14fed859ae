//! Presentation mapper: payload in, ordered display sections out.

use serde_json::Value;

use crate::{
    error::WeatherError,
    format::{
        ColorTag, PressureTrend, color_for_temperature, color_for_uv_index, format_number,
        format_optional, format_time_of_day, progress_ratio, temperature_range_ratio,
    },
    model::{PayloadClass, WeatherData, classify_payload},
};

/// Humidity is a percentage.
const HUMIDITY_SCALE: f64 = 100.0;
/// Top of the UV index scale shown by the bar.
const UV_SCALE: f64 = 11.0;
/// Wind speed (km/h) that fills the wind bar.
const WIND_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Location,
    CurrentConditions,
    WindPressure,
    TemperatureDetail,
    SunTimes,
    Summary,
}

/// A bar hint: how much of it to fill and in which color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub ratio: f64,
    pub color: ColorTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    pub color: Option<ColorTag>,
    pub bold: bool,
    pub bar: Option<Bar>,
}

impl Row {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into(), color: None, bold: false, bar: None }
    }

    fn colored(mut self, color: ColorTag) -> Self {
        self.color = Some(color);
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn with_bar(mut self, ratio: f64, color: ColorTag) -> Self {
        self.bar = Some(Bar { ratio, color });
        self
    }

    fn bar_only(ratio: f64, color: ColorTag) -> Self {
        Self::new("", "").with_bar(ratio, color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySection {
    pub kind: SectionKind,
    pub title: &'static str,
    pub accent: ColorTag,
    pub rows: Vec<Row>,
}

impl DisplaySection {
    #[cfg(test)]
    pub fn row(&self, label: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// What the session should show for one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Error(String),
    Sections(Vec<DisplaySection>),
}

/// Classify `payload` and, for data payloads, build its sections.
///
/// `city` is what the user typed; it stands in for a missing display name.
pub fn present(payload: &Value, city: &str) -> Result<Presentation, WeatherError> {
    Ok(match classify_payload(payload)? {
        PayloadClass::Error(message) => Presentation::Error(message),
        PayloadClass::Data(data) => Presentation::Sections(build_sections(&data, city)),
    })
}

pub fn build_sections(data: &WeatherData, city: &str) -> Vec<DisplaySection> {
    let mut sections = vec![
        location_section(data, city),
        conditions_section(data),
        wind_section(data),
        temperature_section(data),
        sun_section(data),
    ];

    if let Some(summary) = data.summary.as_deref().filter(|s| !s.is_empty()) {
        sections.push(DisplaySection {
            kind: SectionKind::Summary,
            title: "📝 Summary",
            accent: ColorTag::BrightCyan,
            rows: vec![Row::new("", summary).colored(ColorTag::BrightWhite).bold()],
        });
    }

    sections
}

fn location_section(data: &WeatherData, city: &str) -> DisplaySection {
    let loc = &data.location;
    let mut rows = vec![
        Row::new("📍 Location:", loc.display_name.as_deref().unwrap_or(city))
            .colored(ColorTag::Yellow)
            .bold(),
    ];
    if let Some(context) = loc.display_context.as_deref().filter(|c| !c.is_empty()) {
        rows.push(Row::new("🌍 Region:", context));
    }
    rows.push(Row::new(
        "🕐 Timezone:",
        loc.iana_time_zone.as_deref().unwrap_or(crate::model::NOT_AVAILABLE),
    ));

    DisplaySection {
        kind: SectionKind::Location,
        title: "📍 Location Info",
        accent: ColorTag::BrightBlue,
        rows,
    }
}

fn conditions_section(data: &WeatherData) -> DisplaySection {
    let obs = &data.observation;
    let temp = obs.temperature();
    let humidity = obs.humidity();
    let uv = obs.uv_index();
    let uv_color = color_for_uv_index(uv);

    DisplaySection {
        kind: SectionKind::CurrentConditions,
        title: "🌤️  Current Conditions",
        accent: ColorTag::Green,
        rows: vec![
            Row::new(
                "🌡️  Temperature:",
                format!(
                    "{}°C (Feels like {}°C)",
                    format_number(temp),
                    format_number(obs.feels_like())
                ),
            )
            .colored(color_for_temperature(temp))
            .bold(),
            Row::new("☁️  Condition:", obs.condition()).colored(ColorTag::Cyan).bold(),
            Row::new("💧 Humidity:", format!("{}%", format_number(humidity)))
                .with_bar(progress_ratio(humidity, HUMIDITY_SCALE), ColorTag::Blue),
            Row::new(
                "☀️  UV Index:",
                format!("{} ({})", format_number(uv), obs.uv_description()),
            )
            .with_bar(progress_ratio(uv, UV_SCALE), uv_color),
            Row::new("👁️  Visibility:", format!("{} km", format_number(obs.visibility()))),
        ],
    }
}

fn wind_section(data: &WeatherData) -> DisplaySection {
    let obs = &data.observation;
    let wind = obs.wind_speed();
    let trend_label = obs.pressure_trend();
    let trend = PressureTrend::from_label(trend_label);

    DisplaySection {
        kind: SectionKind::WindPressure,
        title: "🌬️  Wind & Pressure",
        accent: ColorTag::Magenta,
        rows: vec![
            Row::new(
                "💨 Wind Speed:",
                format!("{} km/h {}", format_number(wind), obs.wind_direction()),
            ),
            Row::bar_only(progress_ratio(wind, WIND_SCALE), ColorTag::Cyan),
            Row::new(
                "🎚️  Pressure:",
                format!("{:.1} mb {} {}", obs.pressure(), trend.icon(), trend_label),
            ),
        ],
    }
}

fn temperature_section(data: &WeatherData) -> DisplaySection {
    let obs = &data.observation;
    let (min, max) = (obs.temperature_min_24_hour, obs.temperature_max_24_hour);
    let mut rows = Vec::with_capacity(3);

    if let Some(ratio) = temperature_range_ratio(obs.temperature(), min, max) {
        rows.push(Row::new(
            "📊 24h Range:",
            format!("{}°C → {}°C", format_optional(min), format_optional(max)),
        ));
        rows.push(Row::bar_only(ratio, ColorTag::Yellow));
    }
    rows.push(Row::new(
        "💧 Dew Point:",
        format!("{}°C", format_optional(obs.temperature_dew_point)),
    ));

    DisplaySection {
        kind: SectionKind::TemperatureDetail,
        title: "🌡️  Temperature Details",
        accent: ColorTag::Yellow,
        rows,
    }
}

fn sun_section(data: &WeatherData) -> DisplaySection {
    let obs = &data.observation;
    let period = if obs.is_daytime() { "☀️  Daytime" } else { "🌙 Nighttime" };

    DisplaySection {
        kind: SectionKind::SunTimes,
        title: "🌅 Sun Times",
        accent: ColorTag::Orange,
        rows: vec![
            Row::new("🌅 Sunrise:", format_time_of_day(obs.sunrise())).colored(ColorTag::Yellow),
            Row::new("🌇 Sunset:", format_time_of_day(obs.sunset())).colored(ColorTag::Orange),
            Row::new("🌓 Period:", period),
        ],
    }
}
