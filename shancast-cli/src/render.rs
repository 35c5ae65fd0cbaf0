//! Plain-text rendering of the dashboard.

use std::fmt::Write as _;

use chrono::Local;

use shancast_core::{
    Dashboard, Screen, Theme,
    dashboard::ReadyView,
    view::{DailySeries, HourlyPoint},
};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// ANSI accent for the active theme, or nothing when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    accent: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn new(theme: Theme, color: bool) -> Self {
        if !color {
            return Self { accent: "", reset: "" };
        }
        let accent = match theme {
            Theme::Blue => "\x1b[94m",
            Theme::Gold => "\x1b[93m",
        };
        Self { accent, reset: "\x1b[0m" }
    }

    fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.accent, text, self.reset)
    }
}

pub fn dashboard(dash: &Dashboard, color: bool) -> String {
    let palette = Palette::new(dash.theme(), color);
    let mut out = String::new();

    header(&mut out, dash, &palette);
    search(&mut out, dash, &palette);
    if dash.is_favorites_open() {
        favorites_panel(&mut out, dash.favorites(), &palette);
    }

    match dash.screen() {
        Screen::Loading => {
            let _ = writeln!(out, "\n  … loading weather for {}", dash.selected_city());
        }
        Screen::Ready(view) => ready(&mut out, &view, &palette),
    }

    out
}

fn header(out: &mut String, dash: &Dashboard, palette: &Palette) {
    let theme = match dash.theme() {
        Theme::Blue => "blue",
        Theme::Gold => "gold",
    };
    let _ = writeln!(
        out,
        "{}   ♥ {} favorites   theme: {}",
        palette.paint("ShanCast"),
        dash.favorites().len(),
        theme
    );
}

fn search(out: &mut String, dash: &Dashboard, palette: &Palette) {
    if dash.search_text().is_empty() {
        return;
    }
    let _ = writeln!(out, "Search: {}", dash.search_text());
    for (i, name) in dash.suggestions().iter().enumerate() {
        let _ = writeln!(out, "  {} {}", palette.paint(&format!("#{}", i + 1)), name);
    }
}

pub fn favorites_panel(out: &mut String, favorites: &[String], palette: &Palette) {
    let _ = writeln!(out, "{}", palette.paint("Favorite Cities"));
    if favorites.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (i, city) in favorites.iter().enumerate() {
        let _ = writeln!(out, "  {}. ♥ {}", i + 1, city);
    }
}

fn ready(out: &mut String, view: &ReadyView, palette: &Palette) {
    let current = &view.current;
    let heart = if view.is_favorite { "♥" } else { "♡" };

    let _ = writeln!(out);
    let _ = writeln!(out, "📍 {} {}", palette.paint(&current.city), heart);
    if current.place != current.city {
        let _ = writeln!(out, "   {}", current.place);
    }
    let _ = writeln!(
        out,
        "   {} {}°C  {}",
        current.glyph.symbol(),
        current.temperature_c,
        current.condition
    );
    let _ = writeln!(
        out,
        "   Wind {} km/h · Humidity {}% · UV {}",
        current.wind_kph, current.humidity_pct, current.uv_index
    );
    let updated = view.fetched_at.with_timezone(&Local).format("%H:%M");
    if view.stale {
        let _ = writeln!(out, "   Updated {updated} (refresh failed, showing last known data)");
    } else {
        let _ = writeln!(out, "   Updated {updated}");
    }

    hourly_chart(out, &view.hourly, palette);
    weekly_chart(out, &view.daily, palette);

    if !view.calendar.is_empty() {
        let _ = writeln!(out, "\n{}", palette.paint("Weather Calendar"));
        let tiles: Vec<String> = view
            .calendar
            .iter()
            .map(|t| format!("{} {} {}°C", t.date.format("%a %d"), t.glyph.symbol(), t.avg_temp_c))
            .collect();
        let _ = writeln!(out, "  {}", tiles.join(" | "));
    }
}

fn hourly_chart(out: &mut String, hourly: &[HourlyPoint], palette: &Palette) {
    let _ = writeln!(out, "\n{}", palette.paint("24-Hour Forecast"));
    let (Some(first), Some(last)) = (hourly.first(), hourly.last()) else {
        let _ = writeln!(out, "  (no hourly data)");
        return;
    };

    let temps: Vec<f64> = hourly.iter().map(|p| p.temperature_c).collect();
    let (lo, hi) = bounds(&temps);
    let _ = writeln!(
        out,
        "  {} {} {}  ({:.0}°C to {:.0}°C)",
        first.time.format("%H:%M"),
        sparkline(&temps, lo, hi),
        last.time.format("%H:%M"),
        lo,
        hi
    );
}

fn weekly_chart(out: &mut String, daily: &DailySeries, palette: &Palette) {
    let _ = writeln!(out, "\n{}", palette.paint("7-Day Forecast"));
    if daily.is_empty() {
        let _ = writeln!(out, "  (no daily data)");
        return;
    }

    let max: Vec<f64> = daily.max.iter().map(|p| p.temperature_c).collect();
    let min: Vec<f64> = daily.min.iter().map(|p| p.temperature_c).collect();
    // One scale for both lines so they stay comparable.
    let (lo, _) = bounds(&min);
    let (_, hi) = bounds(&max);

    let _ = writeln!(out, "  max {}  {}", sparkline(&max, lo, hi), temps_list(&max));
    let _ = writeln!(out, "  min {}  {}", sparkline(&min, lo, hi), temps_list(&min));
}

fn temps_list(values: &[f64]) -> String {
    values.iter().map(|v| format!("{v:.0}")).collect::<Vec<_>>().join(" ")
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}

fn sparkline(values: &[f64], lo: f64, hi: f64) -> String {
    let span = hi - lo;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                return BARS[0];
            }
            let idx = (((v - lo) / span) * (BARS.len() - 1) as f64).round() as usize;
            BARS[idx.min(BARS.len() - 1)]
        })
        .collect()
}
