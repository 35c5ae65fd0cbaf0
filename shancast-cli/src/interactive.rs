//! `shancast watch`: the live dashboard driven by line commands on stdin.

use std::{
    io::{BufRead, Write as _},
    sync::Arc,
    thread,
    time::Duration,
};

use shancast_core::{Dashboard, DashboardEvent, WeatherProvider, runner};
use tokio::sync::mpsc;
use tracing::debug;

use crate::render;

pub const HELP: &str = "\
Commands:
  <text>      search cities
  (empty)     open the typed search text
  #N          pick suggestion N
  :f          show or hide favorites
  :f N        open favorite N
  :fav        add or remove the shown city from favorites
  :fav NAME   add or remove NAME
  :t          switch theme
  :r          refresh now
  :x          close suggestions
  :q          quit";

/// Map one input line to a dashboard event.
pub fn parse_command(line: &str) -> Option<DashboardEvent> {
    let line = line.trim();

    if line.is_empty() {
        return Some(DashboardEvent::SubmitSearch);
    }

    if let Some(n) = line.strip_prefix('#') {
        return one_based(n).map(DashboardEvent::PickSuggestion);
    }

    let Some(cmd) = line.strip_prefix(':') else {
        return Some(DashboardEvent::SetSearchText(line.to_string()));
    };

    let (name, arg) = match cmd.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (cmd, ""),
    };

    match (name, arg) {
        ("q", _) => Some(DashboardEvent::Quit),
        ("t", _) => Some(DashboardEvent::ToggleTheme),
        ("r", _) => Some(DashboardEvent::Refresh),
        ("x", _) => Some(DashboardEvent::DismissDropdown),
        ("f", "") => Some(DashboardEvent::ToggleFavoritesPanel),
        ("f", n) => one_based(n).map(DashboardEvent::PickFavorite),
        ("fav", "") => Some(DashboardEvent::ToggleCurrentFavorite),
        ("fav", city) => Some(DashboardEvent::ToggleFavorite(city.to_string())),
        _ => None,
    }
}

fn one_based(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

/// Run the live dashboard until `:q` or end of input.
pub async fn run(
    dashboard: Dashboard,
    provider: Arc<dyn WeatherProvider>,
    refresh: Duration,
    color: bool,
) {
    let (tx, rx) = mpsc::channel(16);

    // Plain thread: a pending blocking read must not keep the runtime alive.
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                None => eprintln!("unknown command: {line}\n{HELP}"),
            }
        }
        debug!("stdin closed");
    });

    println!("{HELP}\n");

    let redraw = move |dash: &Dashboard| {
        let screen = render::dashboard(dash, color);
        let mut stdout = std::io::stdout().lock();
        if color {
            // Clear screen and home the cursor.
            let _ = write!(stdout, "\x1b[2J\x1b[H");
        }
        let _ = writeln!(stdout, "{screen}");
        let _ = stdout.flush();
    };

    runner::run(dashboard, provider, refresh, rx, redraw).await;
}
