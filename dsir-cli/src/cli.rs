use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dsir_core::{
    Config, HistoryLookup, MemoryContainer, RainLookup, backend_from_config, daily_history_url,
    parse_threshold,
};
use inquire::Text;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dsir", version, about = "Days since it rained")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the server url and template directory.
    Configure,

    /// Show how long ago it last rained at an address.
    Rain {
        /// Street address or place name.
        address: String,

        /// Only count days with more precipitation than this. Non-numbers count as 0.
        #[arg(long)]
        threshold: Option<String>,

        /// Write the rendered HTML here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show an airport's weather on a past date.
    History {
        /// Airport code, e.g. KSEA.
        airport: String,

        /// Date as YYYY-MM-DD.
        #[arg(value_parser = parse_date)]
        date: NaiveDate,

        /// Also print the daily history page link.
        #[arg(long)]
        link: bool,

        /// Write the rendered HTML here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("'{raw}' is not a YYYY-MM-DD date: {e}"))
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Rain { address, threshold, output } => {
                let config = Config::load()?.with_env_overrides();
                let threshold = threshold
                    .as_deref()
                    .map(parse_threshold)
                    .unwrap_or_else(|| config.default_threshold());

                let backend = Arc::from(backend_from_config(&config)?);
                let templates = Arc::new(config.template_registry()?);
                let lookup = RainLookup::new(backend, templates);

                let container = MemoryContainer::new();
                let view = lookup.find_rain(&address, threshold, &container).await?;
                log::info!("rendered {:?} for {address:?}", view.template());

                emit(&container, output.as_ref())
            }
            Command::History { airport, date, link, output } => {
                let config = Config::load()?.with_env_overrides();
                let date = date.format("%Y-%m-%d").to_string();

                let backend = Arc::from(backend_from_config(&config)?);
                let templates = Arc::new(config.template_registry()?);
                let lookup = HistoryLookup::new(backend, templates);

                let container = MemoryContainer::new();
                let view = lookup.airport_history(&airport, &date, &container).await?;
                log::info!("rendered {} for {airport} on {date}", view.template());

                emit(&container, output.as_ref())?;
                if link {
                    println!("{}", daily_history_url(&airport, &date)?);
                }
                Ok(())
            }
        }
    }
}

/// Prompt for each setting, keeping the current value as the default.
fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let base_url = Text::new("Server url:")
        .with_default(config.base_url())
        .prompt()
        .context("Failed to read server url")?;
    config.base_url = Some(base_url.trim().to_string());

    let current_dir = config
        .templates_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    let templates_dir = Text::new("Templates directory (empty for built-in templates):")
        .with_default(&current_dir)
        .prompt()
        .context("Failed to read templates directory")?;
    config.templates_dir =
        Some(templates_dir.trim()).filter(|d| !d.is_empty()).map(PathBuf::from);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Copy the container's content to its final destination.
fn emit(container: &MemoryContainer, output: Option<&PathBuf>) -> Result<()> {
    let html = container.contents();
    match output {
        Some(path) => fs::write(path, html)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            println!("{html}");
            Ok(())
        }
    }
}
