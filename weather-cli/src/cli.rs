use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, Text};
use is_terminal::IsTerminal;
use weather_core::{Config, HttpWeatherClient};

use crate::{
    console::{InquireConsole, prompt_error},
    logging,
    render::Renderer,
    session::{self, Interrupted},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Look up the weather for a city, right in the terminal")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Endpoint URL, overriding the config file for this run.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// API key, overriding the config file for this run.
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API endpoint and key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        logging::init(self.verbose);

        let path = match &self.config {
            Some(path) => path.clone(),
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&path)?;
        let styled = !self.no_color && io::stdout().is_terminal();
        let columns = crossterm::terminal::size().map_or(DEFAULT_COLUMNS, |(w, _)| usize::from(w));
        let renderer = Renderer::new(styled, config.bar_width, columns);

        let result = match self.command {
            Some(Command::Configure) => configure(config, &path),
            None => {
                let config = apply_overrides(config, self.api_url, self.api_key);
                lookup(&config, &renderer, styled).await
            }
        };

        finish(result, &renderer, &mut io::stdout().lock())
    }
}

/// Terminal width assumed when it cannot be queried.
const DEFAULT_COLUMNS: usize = 80;

/// An interrupt is a normal way out: say goodbye and exit cleanly.
fn finish(
    result: anyhow::Result<()>,
    renderer: &Renderer,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match result {
        Err(err) if err.is::<Interrupted>() => {
            tracing::debug!("session interrupted");
            let _ = writeln!(out, "{}", renderer.interrupted());
            Ok(())
        }
        other => other,
    }
}

fn apply_overrides(mut config: Config, api_url: Option<String>, api_key: Option<String>) -> Config {
    if api_url.is_some() {
        config.api_url = api_url;
    }
    if api_key.is_some() {
        config.api_key = api_key;
    }
    config
}

async fn lookup(config: &Config, renderer: &Renderer, animate: bool) -> anyhow::Result<()> {
    let endpoint = config.endpoint()?;
    let client = HttpWeatherClient::new(endpoint, config.timeout())?;
    let mut console = InquireConsole::new(animate);

    session::run(&client, &mut console, renderer, &config.default_city).await
}

fn configure(mut config: Config, path: &std::path::Path) -> anyhow::Result<()> {
    let mut url_prompt = Text::new("API URL:");
    if let Some(current) = config.api_url.as_deref() {
        url_prompt = url_prompt.with_default(current);
    }
    let api_url = url_prompt.prompt().map_err(prompt_error)?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .prompt()
        .map_err(prompt_error)?;

    config.set_endpoint(api_url.trim().to_string(), api_key.trim().to_string());
    config.endpoint().context("Configuration not saved")?;
    config.save_to(path)?;

    println!("Configuration saved to {}", path.display());
    Ok(())
}
