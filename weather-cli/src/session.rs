//! The interactive lookup loop: prompt, fetch, render, menu.

use std::fmt;

use weather_core::{Presentation, WeatherClient, WeatherError, present};

use crate::render::Renderer;

/// Raised when the user interrupts a prompt or an in-flight request.
#[derive(Debug, thiserror::Error)]
#[error("interrupted by user")]
pub struct Interrupted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SearchAgain,
    Exit,
}

impl MenuChoice {
    pub const fn all() -> &'static [MenuChoice] {
        &[MenuChoice::SearchAgain, MenuChoice::Exit]
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::SearchAgain => f.write_str("1. Search for another city"),
            MenuChoice::Exit => f.write_str("2. Exit"),
        }
    }
}

/// Terminal surface the session talks to.
pub trait Console {
    fn clear(&mut self);
    fn print(&mut self, text: &str);
    /// Show `text` as a transient status line until [`Console::end_status`].
    fn begin_status(&mut self, text: &str);
    fn end_status(&mut self);
    fn ask_city(&mut self, default: Option<&str>) -> anyhow::Result<String>;
    fn ask_menu(&mut self) -> anyhow::Result<MenuChoice>;
}

/// Turn raw prompt input into a city to look up.
///
/// An exactly empty answer takes `default` when one is offered; anything that
/// trims to nothing is rejected.
pub fn resolve_city(input: &str, default: Option<&str>) -> Option<String> {
    if input.is_empty() {
        return default.map(str::to_owned);
    }
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Run until the user picks "Exit" (Ok) or interrupts ([`Interrupted`]).
pub async fn run<C, T>(
    client: &C,
    console: &mut T,
    renderer: &Renderer,
    default_city: &str,
) -> anyhow::Result<()>
where
    C: WeatherClient + ?Sized,
    T: Console,
{
    console.clear();
    console.print(&renderer.header());

    let mut default = Some(default_city);

    loop {
        let input = console.ask_city(default)?;
        let Some(city) = resolve_city(&input, default) else {
            console.print(&renderer.validation());
            continue;
        };
        default = None;

        console.print("");
        console.begin_status(&renderer.fetching(&city));
        tracing::info!(%city, "looking up weather");

        let fetched = tokio::select! {
            res = client.fetch(&city) => res,
            Ok(()) = tokio::signal::ctrl_c() => {
                console.end_status();
                return Err(Interrupted.into());
            }
        };
        console.end_status();

        console.print("");
        match fetched.and_then(|payload| present(&payload, &city)) {
            Ok(Presentation::Sections(sections)) => console.print(&renderer.sections(&sections)),
            Ok(Presentation::Error(message)) => {
                tracing::info!(%city, %message, "weather service reported an error");
                console.print(&renderer.api_error(&message));
            }
            Err(err) => report(console, renderer, &err),
        }

        console.print("");
        match console.ask_menu()? {
            MenuChoice::Exit => {
                console.print(&renderer.farewell());
                return Ok(());
            }
            MenuChoice::SearchAgain => {
                console.clear();
                console.print(&renderer.header());
            }
        }
    }
}

fn report<T: Console>(console: &mut T, renderer: &Renderer, err: &WeatherError) {
    tracing::warn!(error = %err, "weather lookup failed");
    console.print(&renderer.error(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::{collections::VecDeque, sync::Mutex};
    use weather_core::error::StatusCode;

    #[derive(Debug, Default)]
    struct ScriptedConsole {
        cities: VecDeque<&'static str>,
        choices: VecDeque<MenuChoice>,
        offered_defaults: Vec<Option<String>>,
        output: Vec<String>,
        status: Option<String>,
        finished_statuses: Vec<String>,
        clears: usize,
    }

    impl ScriptedConsole {
        fn new(cities: &[&'static str], choices: &[MenuChoice]) -> Self {
            Self {
                cities: cities.iter().copied().collect(),
                choices: choices.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn text(&self) -> String {
            self.output.join("\n")
        }
    }

    impl Console for ScriptedConsole {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn print(&mut self, text: &str) {
            self.output.push(text.to_string());
        }

        fn begin_status(&mut self, text: &str) {
            assert!(self.status.is_none(), "status already showing");
            self.status = Some(text.to_string());
        }

        fn end_status(&mut self) {
            let status = self.status.take().expect("no status to end");
            self.finished_statuses.push(status);
        }

        fn ask_city(&mut self, default: Option<&str>) -> anyhow::Result<String> {
            self.offered_defaults.push(default.map(str::to_owned));
            self.cities.pop_front().map(str::to_owned).ok_or_else(|| Interrupted.into())
        }

        fn ask_menu(&mut self) -> anyhow::Result<MenuChoice> {
            assert!(self.status.is_none(), "status left running into the menu");
            self.choices.pop_front().ok_or_else(|| Interrupted.into())
        }
    }

    #[derive(Debug, Default)]
    struct FakeClient {
        responses: Mutex<VecDeque<Result<Value, WeatherError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn replying(responses: Vec<Result<Value, WeatherError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherClient for FakeClient {
        async fn fetch(&self, city: &str) -> Result<Value, WeatherError> {
            self.calls.lock().unwrap().push(city.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(false, 15, 80)
    }

    fn sample_payload() -> Value {
        json!({
            "matched_location": { "display_name": "Lisbon", "display_context": "Portugal" },
            "current_observation": {
                "temperature": 22,
                "relativeHumidity": 60,
                "uvIndex": 4,
                "uvDescription": "Moderate"
            }
        })
    }

    #[test]
    fn resolve_city_rules() {
        assert_eq!(resolve_city("", Some("London")), Some("London".into()));
        assert_eq!(resolve_city("", None), None);
        assert_eq!(resolve_city("   ", Some("London")), None);
        assert_eq!(resolve_city("  Paris ", None), Some("Paris".into()));
    }

    #[tokio::test]
    async fn whitespace_city_is_rejected_without_fetching() {
        let client = FakeClient::default();
        let mut console = ScriptedConsole::new(&["   ", "Paris"], &[MenuChoice::Exit]);

        run(&client, &mut console, &renderer(), "London").await.unwrap();

        assert_eq!(client.calls(), vec!["Paris".to_string()]);
        assert!(console.text().contains("Please enter a valid city name"));
    }

    #[tokio::test]
    async fn empty_initial_answer_uses_default_city() {
        let client = FakeClient::default();
        let mut console = ScriptedConsole::new(
            &["", "", "Rome"],
            &[MenuChoice::SearchAgain, MenuChoice::Exit],
        );

        run(&client, &mut console, &renderer(), "London").await.unwrap();

        assert_eq!(client.calls(), vec!["London".to_string(), "Rome".to_string()]);
        assert_eq!(
            console.offered_defaults,
            vec![Some("London".to_string()), None, None]
        );
        assert_eq!(console.text().matches("Please enter a valid city name").count(), 1);
    }

    #[tokio::test]
    async fn error_payload_message_is_shown() {
        let client = FakeClient::replying(vec![Ok(json!({
            "error": "city not found",
            "current_observation": { "temperature": 40 }
        }))]);
        let mut console = ScriptedConsole::new(&["Atlantis"], &[MenuChoice::Exit]);

        run(&client, &mut console, &renderer(), "London").await.unwrap();

        let text = console.text();
        assert!(text.contains("API Error: city not found"));
        assert!(!text.contains("Current Conditions"));
        assert!(!text.contains("40°C"));
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_and_loop_continues() {
        let client = FakeClient::replying(vec![
            Err(WeatherError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "maintenance".into(),
            }),
            Ok(sample_payload()),
        ]);
        let mut console = ScriptedConsole::new(
            &["Oslo", "Lisbon"],
            &[MenuChoice::SearchAgain, MenuChoice::Exit],
        );

        run(&client, &mut console, &renderer(), "London").await.unwrap();

        let text = console.text();
        assert!(text.contains("Error: Failed to fetch weather data"));
        assert!(text.contains("maintenance"));
        assert!(text.contains("Lisbon"));
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn successful_lookup_renders_all_sections() {
        let client = FakeClient::replying(vec![Ok(sample_payload())]);
        let mut console = ScriptedConsole::new(&["Lisbon"], &[MenuChoice::Exit]);

        run(&client, &mut console, &renderer(), "London").await.unwrap();

        let text = console.text();
        for title in [
            "Location Info",
            "Current Conditions",
            "Wind & Pressure",
            "Temperature Details",
            "Sun Times",
        ] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(!text.contains("Summary"));
        assert!(text.contains("22°C (Feels like 22°C)"));
        assert!(text.contains("60% █████████░░░░░░"));
        assert!(text.contains("4 (Moderate)"));
        let location = text.find("Location Info").unwrap();
        let sun = text.find("Sun Times").unwrap();
        assert!(location < sun);
    }

    #[tokio::test]
    async fn fetch_status_is_shown_and_cleared_for_each_lookup() {
        let client = FakeClient::replying(vec![
            Ok(sample_payload()),
            Err(WeatherError::MalformedPayload("a string")),
        ]);
        let mut console = ScriptedConsole::new(
            &["Lisbon", "Oslo"],
            &[MenuChoice::SearchAgain, MenuChoice::Exit],
        );

        run(&client, &mut console, &renderer(), "London").await.unwrap();

        assert_eq!(
            console.finished_statuses,
            vec![
                "Fetching weather for Lisbon...".to_string(),
                "Fetching weather for Oslo...".to_string(),
            ]
        );
        assert!(console.status.is_none());
        assert!(!console.text().contains("Fetching weather"));
    }

    #[tokio::test]
    async fn exit_prints_one_farewell() {
        let client = FakeClient::replying(vec![Ok(sample_payload()), Ok(sample_payload())]);
        let mut console = ScriptedConsole::new(
            &["Lisbon", "Lisbon"],
            &[MenuChoice::SearchAgain, MenuChoice::Exit],
        );

        let result = run(&client, &mut console, &renderer(), "London").await;

        assert!(result.is_ok());
        assert_eq!(console.text().matches("Thanks for using Weather TUI!").count(), 1);
        // initial draw plus one redraw for "search again"
        assert_eq!(console.clears, 2);
    }

    #[tokio::test]
    async fn interrupt_at_prompt_surfaces_as_interrupted() {
        let client = FakeClient::default();
        let mut console = ScriptedConsole::new(&[], &[]);

        let err = run(&client, &mut console, &renderer(), "London").await.unwrap_err();

        assert!(err.is::<Interrupted>());
        assert!(client.calls().is_empty());
        assert!(!console.text().contains("Thanks for using"));
    }
}
