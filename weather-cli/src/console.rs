use std::{
    io::{self, Write},
    time::Duration,
};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{InquireError, Select, Text};

use crate::session::{Console, Interrupted, MenuChoice};

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Interactive terminal console backed by `inquire` prompts.
///
/// With `animate` set, status lines run as an `indicatif` spinner; otherwise
/// they are printed once as plain text.
#[derive(Default)]
pub struct InquireConsole {
    animate: bool,
    spinner: Option<ProgressBar>,
}

impl InquireConsole {
    pub fn new(animate: bool) -> Self {
        Self { animate, spinner: None }
    }
}

impl Console for InquireConsole {
    fn clear(&mut self) {
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)) {
            tracing::debug!(error = %err, "could not clear terminal");
        }
    }

    fn print(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        // A closed stdout leaves nothing useful to report to.
        let _ = writeln!(stdout, "{text}");
    }

    fn begin_status(&mut self, text: &str) {
        self.end_status();
        if !self.animate {
            self.print(text);
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(text.to_string());
        spinner.enable_steady_tick(SPINNER_TICK);
        self.spinner = Some(spinner);
    }

    fn end_status(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn ask_city(&mut self, default: Option<&str>) -> anyhow::Result<String> {
        let mut prompt = Text::new("Enter city name:");
        if let Some(default) = default {
            prompt = prompt.with_default(default);
        }
        prompt.prompt().map_err(prompt_error)
    }

    fn ask_menu(&mut self) -> anyhow::Result<MenuChoice> {
        Select::new("Choose an option:", MenuChoice::all().to_vec())
            .with_starting_cursor(0)
            .prompt()
            .map_err(prompt_error)
    }
}

/// Ctrl-C and Esc both end the session.
pub fn prompt_error(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationInterrupted | InquireError::OperationCanceled => Interrupted.into(),
        other => anyhow::Error::new(other).context("Failed to read from the terminal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_and_interrupt_end_the_session() {
        assert!(prompt_error(InquireError::OperationInterrupted).is::<Interrupted>());
        assert!(prompt_error(InquireError::OperationCanceled).is::<Interrupted>());
        assert!(!prompt_error(InquireError::NotTTY).is::<Interrupted>());
    }

    #[test]
    fn spinner_runs_until_status_ends() {
        let mut console = InquireConsole::new(true);

        console.begin_status("Fetching weather for Lisbon...");
        let spinner = console.spinner.clone().unwrap();
        assert_eq!(spinner.message(), "Fetching weather for Lisbon...");
        assert!(!spinner.is_finished());

        console.end_status();
        assert!(console.spinner.is_none());
        assert!(spinner.is_finished());
    }

    #[test]
    fn plain_console_never_starts_a_spinner() {
        let mut console = InquireConsole::new(false);
        console.begin_status("Fetching weather for Lisbon...");
        assert!(console.spinner.is_none());
        console.end_status();
    }
}
