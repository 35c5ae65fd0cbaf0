//! Core library for the `shancast` weather dashboard.
//!
//! This crate defines:
//! - Configuration and local storage
//! - The weather provider abstraction and its WeatherAPI.com client
//! - City search, favorites and the view models derived from a snapshot
//! - The dashboard controller and the event loop that polls for updates
//!
//! It is used by `shancast-cli`, but has no terminal-specific code.

pub mod cities;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod favorites;
pub mod model;
pub mod provider;
pub mod runner;
pub mod storage;
pub mod view;

pub use cities::CityIndex;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardEvent, Effect, FetchOutcome, FetchTicket, FetchStatus, Screen, Theme};
pub use error::FetchError;
pub use favorites::Favorites;
pub use model::{CurrentConditions, DailyForecast, HourlyForecast, Location, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use storage::{FileStorage, MemoryStorage, Storage};
