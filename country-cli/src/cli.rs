use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use country_core::{
    Config, DetailPanel, Directory, Filters, GraphqlCountrySource, SortKey, WeatherService,
    load_directory,
};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::{browse, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "countries", version, about = "Country directory with on-demand weather")]
pub struct Cli {
    /// GraphQL endpoint to query instead of the configured one.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and GraphQL endpoint.
    Configure,

    /// List countries, optionally searched, filtered and sorted.
    List {
        /// Case-insensitive substring of the country name.
        #[arg(long, short)]
        search: Option<String>,

        /// Only countries on this continent.
        #[arg(long, short)]
        continent: Option<String>,

        /// Only countries where this language is spoken.
        #[arg(long, short)]
        language: Option<String>,

        /// "name" or "continent"; defaults to the configured sort, else source order.
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Show every continent present in the data.
    Continents,

    /// Show every language present in the data.
    Languages,

    /// Show the expanded card for one country, by ISO code or name.
    Show {
        country: String,

        /// Skip the weather lookup.
        #[arg(long)]
        no_weather: bool,
    },

    /// Interactive search/filter/sort session.
    Browse,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let endpoint = self.endpoint.as_deref().unwrap_or(config.endpoint()).to_string();

        match self.command {
            Command::Configure => configure(config),
            Command::List { search, continent, language, sort } => {
                let sort = match sort {
                    Some(sort) => Some(sort),
                    None => config.default_sort()?,
                };
                let filters =
                    Filters { search: search.unwrap_or_default(), continent, language, sort };
                let directory = load(&config, &endpoint, filters).await?;
                println!("{}", render::list(&directory));
                Ok(())
            }
            Command::Continents => {
                let directory = load(&config, &endpoint, Filters::default()).await?;
                println!("{}", render::names("Continents", directory.continents()));
                Ok(())
            }
            Command::Languages => {
                let directory = load(&config, &endpoint, Filters::default()).await?;
                println!("{}", render::names("Languages", directory.languages()));
                Ok(())
            }
            Command::Show { country, no_weather } => {
                let directory = load(&config, &endpoint, Filters::default()).await?;
                let country = directory.find(&country)?;

                let mut panel = DetailPanel::new();
                if !no_weather {
                    let weather = WeatherService::from_config(&config)?;
                    panel.expand(country, &weather).await;
                }
                println!("{}", render::details(country, panel.weather()));
                Ok(())
            }
            Command::Browse => {
                let filters = Filters { sort: config.default_sort()?, ..Filters::default() };
                let directory = load(&config, &endpoint, filters).await?;
                let weather = WeatherService::from_config(&config)?;
                if !weather.has_provider() {
                    eprintln!("No weather API key configured; expanded cards will show no weather.");
                }
                browse::run(directory, &weather).await
            }
        }
    }
}

async fn load(config: &Config, endpoint: &str, filters: Filters) -> anyhow::Result<Directory> {
    eprintln!("Loading...");
    tracing::info!(%endpoint, "fetching country list");
    let source = GraphqlCountrySource::new(endpoint, config.request_timeout())?;
    load_directory(&source, filters)
        .await
        .with_context(|| format!("Error loading countries from {endpoint}"))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_weather_api_key(api_key.trim().to_string());
    }

    let endpoint = Text::new("GraphQL endpoint:").with_default(config.endpoint()).prompt()?;
    config.endpoint = Some(endpoint.trim().to_string());

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
