use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Password, PasswordDisplayMode, Text};
use shancast_core::{
    CityIndex, Config, Dashboard, Favorites, FileStorage, Theme, provider_from_config,
};
use tracing::info;

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "shancast", version, about = "Weather dashboard for your terminal")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace). RUST_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Color theme.
    #[arg(long, value_enum, default_value_t = ThemeArg::Blue, global = true)]
    pub theme: ThemeArg,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Blue,
    Gold,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Blue => Theme::Blue,
            ThemeArg::Gold => Theme::Gold,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and refresh interval.
    Configure,

    /// Fetch once and print the dashboard.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Suggest city names containing QUERY.
    Search { query: String },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Live dashboard that refreshes on an interval.
    Watch {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorites in display order.
    List,
    /// Add CITY if missing, remove it otherwise.
    Toggle { city: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let color = !self.no_color;

        match self.command {
            Command::Configure => configure(config, self.config.as_ref())?,
            Command::Search { query } => {
                let index = open_index(&config)?;
                let hits = index.suggest(&query);
                if hits.is_empty() {
                    println!("No cities match '{query}'.");
                }
                for (i, name) in hits.iter().enumerate() {
                    println!("{:>2}. {name}", i + 1);
                }
            }
            Command::Favorites { action } => {
                let mut favorites = open_favorites(&config)?;
                match action {
                    FavoritesAction::List => {}
                    FavoritesAction::Toggle { city } => {
                        let added = !favorites.is_favorite(&city);
                        favorites.toggle(&city)?;
                        println!("{} {city}", if added { "Added" } else { "Removed" });
                    }
                }
                let palette = render::Palette::new(self.theme.into(), color);
                let mut out = String::new();
                render::favorites_panel(&mut out, favorites.cities(), &palette);
                print!("{out}");
            }
            Command::Show { city } => {
                let city = city.unwrap_or_else(|| config.default_city.clone());
                let provider = provider_from_config(&config)?;
                let mut dashboard = build_dashboard(&config, &city, self.theme.into())?;

                let ticket = dashboard.begin_fetch();
                let snapshot = provider
                    .fetch(ticket.city())
                    .await
                    .with_context(|| format!("Failed to fetch weather for '{}'", ticket.city()))?;
                dashboard.complete_fetch(&ticket, Ok(snapshot));

                print!("{}", render::dashboard(&dashboard, color));
            }
            Command::Watch { city } => {
                let city = city.unwrap_or_else(|| config.default_city.clone());
                let provider = provider_from_config(&config)?;
                let dashboard = build_dashboard(&config, &city, self.theme.into())?;

                info!(%city, interval = ?config.refresh_interval(), "starting live dashboard");
                interactive::run(dashboard, provider, config.refresh_interval(), color).await;
            }
        }

        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

fn configure(mut config: Config, path: Option<&PathBuf>) -> anyhow::Result<()> {
    let key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key.trim().to_string());
    }

    config.default_city = Text::new("Default city:").with_default(&config.default_city).prompt()?;

    config.refresh_interval_secs = CustomType::<u64>::new("Refresh interval (seconds):")
        .with_default(config.refresh_interval_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    match path {
        Some(path) => {
            config.save_to(path)?;
            println!("Saved configuration to {}", path.display());
        }
        None => {
            config.save()?;
            println!("Saved configuration to {}", Config::config_file_path()?.display());
        }
    }

    Ok(())
}

fn open_index(config: &Config) -> anyhow::Result<CityIndex> {
    match &config.city_index {
        Some(path) => CityIndex::load(path),
        None => CityIndex::bundled(),
    }
}

fn open_favorites(config: &Config) -> anyhow::Result<Favorites> {
    let storage = FileStorage::new(config.data_dir()?);
    Ok(Favorites::load(Box::new(storage)))
}

fn build_dashboard(config: &Config, city: &str, theme: Theme) -> anyhow::Result<Dashboard> {
    let dashboard = Dashboard::new(city, open_favorites(config)?, open_index(config)?);
    Ok(dashboard.with_theme(theme))
}
