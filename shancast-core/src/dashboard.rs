//! Dashboard controller: owns every piece of UI state and decides when a
//! fetch has to happen.
//!
//! The controller itself never does IO. Events go in through
//! [`Dashboard::handle`], which returns an [`Effect`] for the runner to carry
//! out; fetch results come back through [`Dashboard::complete_fetch`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    FetchError,
    cities::CityIndex,
    favorites::Favorites,
    model::WeatherSnapshot,
    view::{self, CalendarTile, CurrentPanel, DailySeries, HourlyPoint},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Blue,
    Gold,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Blue => Self::Gold,
            Self::Gold => Self::Blue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// User intents coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    SetSearchText(String),
    SubmitSearch,
    /// Choose the n-th (0-based) entry of the current suggestion list.
    PickSuggestion(usize),
    SelectSuggestion(String),
    DismissDropdown,
    ToggleFavoritesPanel,
    /// Choose the n-th (0-based) favorite.
    PickFavorite(usize),
    SelectFavorite(String),
    ToggleFavorite(String),
    /// Toggle the resolved name of the city being displayed.
    ToggleCurrentFavorite,
    ToggleTheme,
    Refresh,
    Quit,
}

/// Work the runner has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The selected city changed or a refresh was requested: fetch it and
    /// restart the polling timer.
    Fetch,
    Quit,
}

/// What the runner did with a finished fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// The response belongs to a city that is no longer selected.
    Discarded,
    /// A fetch issued later has already settled.
    Superseded,
}

/// Handle for one fetch, issued by [`Dashboard::begin_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    city: String,
    seq: u64,
}

impl FetchTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub current: CurrentPanel,
    pub is_favorite: bool,
    pub hourly: Vec<HourlyPoint>,
    pub daily: DailySeries,
    pub calendar: Vec<CalendarTile>,
    /// True when the last fetch failed and this data is from an earlier one.
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// No snapshot for the selected city yet.
    Loading,
    Ready(Box<ReadyView>),
}

/// Cache key for a city: trimmed and lowercased.
pub fn city_key(city: &str) -> String {
    city.trim().to_lowercase()
}

#[derive(Debug)]
pub struct Dashboard {
    selected_city: String,
    search_text: String,
    dropdown_open: bool,
    favorites_open: bool,
    theme: Theme,
    status: FetchStatus,
    snapshots: HashMap<String, WeatherSnapshot>,
    favorites: Favorites,
    index: CityIndex,
    issued: u64,
    settled: u64,
}

impl Dashboard {
    pub fn new(initial_city: &str, favorites: Favorites, index: CityIndex) -> Self {
        Self {
            selected_city: initial_city.trim().to_string(),
            search_text: String::new(),
            dropdown_open: false,
            favorites_open: false,
            theme: Theme::default(),
            status: FetchStatus::Idle,
            snapshots: HashMap::new(),
            favorites,
            index,
            issued: 0,
            settled: 0,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn selected_city(&self) -> &str {
        &self.selected_city
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn is_favorites_open(&self) -> bool {
        self.favorites_open
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn favorites(&self) -> &[String] {
        self.favorites.cities()
    }

    /// Suggestions shown under the search box; empty while the dropdown is closed.
    pub fn suggestions(&self) -> Vec<&str> {
        if !self.dropdown_open {
            return Vec::new();
        }
        self.index.suggest(&self.search_text)
    }

    /// The snapshot for the selected city, if one has ever arrived.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshots.get(&city_key(&self.selected_city))
    }

    pub fn screen(&self) -> Screen {
        let Some(snapshot) = self.snapshot() else {
            return Screen::Loading;
        };

        Screen::Ready(Box::new(ReadyView {
            current: view::current_panel(snapshot),
            is_favorite: self.favorites.is_favorite(&snapshot.location.name),
            hourly: view::hourly_series(snapshot),
            daily: view::daily_series(snapshot),
            calendar: view::calendar_tiles(snapshot),
            stale: self.status == FetchStatus::Error,
            fetched_at: snapshot.fetched_at,
        }))
    }

    pub fn handle(&mut self, event: DashboardEvent) -> Effect {
        debug!(?event, "dashboard event");

        match event {
            DashboardEvent::SetSearchText(text) => {
                self.search_text = text;
                self.dropdown_open = true;
                Effect::None
            }
            DashboardEvent::SubmitSearch => {
                let query = self.search_text.trim().to_string();
                if query.is_empty() {
                    return Effect::None;
                }
                self.dropdown_open = false;
                self.select_city(&query)
            }
            DashboardEvent::PickSuggestion(n) => {
                let picked = self.suggestions().get(n).map(|name| name.to_string());
                match picked {
                    Some(name) => self.handle(DashboardEvent::SelectSuggestion(name)),
                    None => Effect::None,
                }
            }
            DashboardEvent::SelectSuggestion(name) => {
                self.search_text = name.clone();
                self.dropdown_open = false;
                self.select_city(&name)
            }
            DashboardEvent::DismissDropdown => {
                self.dropdown_open = false;
                Effect::None
            }
            DashboardEvent::ToggleFavoritesPanel => {
                self.favorites_open = !self.favorites_open;
                Effect::None
            }
            DashboardEvent::PickFavorite(n) => match self.favorites.cities().get(n).cloned() {
                Some(name) => self.handle(DashboardEvent::SelectFavorite(name)),
                None => Effect::None,
            },
            DashboardEvent::SelectFavorite(name) => {
                self.favorites_open = false;
                self.select_city(&name)
            }
            DashboardEvent::ToggleFavorite(name) => {
                self.toggle_favorite(&name);
                Effect::None
            }
            DashboardEvent::ToggleCurrentFavorite => {
                if let Some(name) = self.snapshot().map(|s| s.location.name.clone()) {
                    self.toggle_favorite(&name);
                }
                Effect::None
            }
            DashboardEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                Effect::None
            }
            DashboardEvent::Refresh => Effect::Fetch,
            DashboardEvent::Quit => Effect::Quit,
        }
    }

    /// Mark the selected city as loading and issue a ticket for fetching it.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.status = FetchStatus::Loading;
        self.issued += 1;
        FetchTicket { city: self.selected_city.clone(), seq: self.issued }
    }

    /// Apply a finished fetch.
    ///
    /// Results for a city other than the selected one are dropped, whatever
    /// order they arrive in, and so are results older than one already
    /// applied. A failure keeps the previous snapshot.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<WeatherSnapshot, FetchError>,
    ) -> FetchOutcome {
        let city = ticket.city();
        let key = city_key(city);
        if key != city_key(&self.selected_city) {
            debug!(%city, selected = %self.selected_city, "discarding response for deselected city");
            return FetchOutcome::Discarded;
        }
        if ticket.seq <= self.settled {
            debug!(%city, seq = ticket.seq, settled = self.settled, "discarding superseded response");
            return FetchOutcome::Superseded;
        }
        self.settled = ticket.seq;

        match result {
            Ok(snapshot) => {
                info!(%city, resolved = %snapshot.location.name, "weather snapshot updated");
                self.snapshots.insert(key, snapshot);
                self.status = FetchStatus::Ready;
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(%city, error = %err, "weather fetch failed, keeping previous snapshot");
                self.status = FetchStatus::Error;
                FetchOutcome::Failed
            }
        }
    }

    /// A fetch task ended without a result. Treated like a failed fetch if
    /// nothing else has settled since.
    pub fn abandon_fetch(&mut self) {
        if self.status == FetchStatus::Loading {
            self.status = FetchStatus::Error;
        }
    }

    fn select_city(&mut self, city: &str) -> Effect {
        let city = city.trim();
        if city.is_empty() {
            return Effect::None;
        }
        if city_key(city) == city_key(&self.selected_city) {
            self.selected_city = city.to_string();
            return Effect::None;
        }

        info!(from = %self.selected_city, to = %city, "selected city changed");
        self.selected_city = city.to_string();
        self.status = FetchStatus::Idle;
        Effect::Fetch
    }

    fn toggle_favorite(&mut self, city: &str) {
        if let Err(err) = self.favorites.toggle(city) {
            warn!(error = %format!("{err:#}"), %city, "favorites changed but could not be saved");
        }
    }
}
