use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::storage::Storage;

/// Storage key holding the JSON-encoded favorites list.
pub const FAVORITES_KEY: &str = "favoriteCities";

/// Seed used when nothing has been persisted yet.
pub const DEFAULT_FAVORITES: [&str; 3] = ["London", "Tokyo", "New York"];

/// User-curated set of city names, kept in display order.
///
/// Every mutation rewrites the whole list to storage; there is no merging
/// with other sessions, the last writer wins.
#[derive(Debug)]
pub struct Favorites {
    cities: Vec<String>,
    storage: Box<dyn Storage>,
}

impl Favorites {
    /// Read the persisted list, falling back to the default seed when it is
    /// missing or can't be read.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let cities = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(cities) => cities,
                Err(err) => {
                    warn!(%err, "persisted favorites are not a JSON list, using defaults");
                    default_cities()
                }
            },
            Ok(None) => {
                debug!("no persisted favorites, seeding defaults");
                default_cities()
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to read favorites, using defaults");
                default_cities()
            }
        };

        Self { cities, storage }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// Remove `city` if present, append it otherwise, then persist.
    ///
    /// The in-memory list is updated even if the write fails.
    pub fn toggle(&mut self, city: &str) -> Result<&[String]> {
        if let Some(pos) = self.cities.iter().position(|c| c == city) {
            self.cities.remove(pos);
        } else {
            self.cities.push(city.to_string());
        }

        self.persist()?;
        Ok(&self.cities)
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn into_storage(self) -> Box<dyn Storage> {
        self.storage
    }

    fn persist(&mut self) -> Result<()> {
        let encoded =
            serde_json::to_string(&self.cities).context("Failed to encode favorites list")?;
        self.storage.set(FAVORITES_KEY, &encoded).context("Failed to persist favorites")
    }
}

fn default_cities() -> Vec<String> {
    DEFAULT_FAVORITES.iter().map(|c| c.to_string()).collect()
}
