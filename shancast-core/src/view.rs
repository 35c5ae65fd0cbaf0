//! Pure transforms from a [`WeatherSnapshot`] into the shapes the widgets draw.
//!
//! None of these fail: missing forecast data produces empty output so a
//! partial snapshot still renders.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::model::WeatherSnapshot;

/// Coarse weather icon derived from a provider condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Sun,
    Cloud,
    Rain,
    Snow,
}

impl Glyph {
    pub fn from_condition(condition: &str) -> Self {
        let c = condition.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| c.contains(w));

        if has(&["rain", "drizzle", "shower", "thunder"]) {
            Self::Rain
        } else if has(&["snow", "sleet", "ice", "blizzard"]) {
            Self::Snow
        } else if has(&["cloud", "overcast", "mist", "fog"]) {
            Self::Cloud
        } else {
            Self::Sun
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::Cloud => "☁",
            Self::Rain => "☂",
            Self::Snow => "❄",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub time: NaiveTime,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub temperature_c: f64,
}

/// Max and min lines of the weekly chart, aligned by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub max: Vec<DailyPoint>,
    pub min: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn is_empty(&self) -> bool {
        self.max.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarTile {
    pub date: NaiveDate,
    pub glyph: Glyph,
    pub avg_temp_c: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub city: String,
    /// Name with region and country, when the provider reports them.
    pub place: String,
    pub temperature_c: i64,
    pub condition: String,
    pub glyph: Glyph,
    pub wind_kph: f64,
    pub humidity_pct: u8,
    pub uv_index: f64,
}

/// Temperature by time of day for the first forecast day.
pub fn hourly_series(snapshot: &WeatherSnapshot) -> Vec<HourlyPoint> {
    snapshot
        .first_day()
        .map(|day| {
            day.hours
                .iter()
                .map(|h| HourlyPoint { time: h.time.time(), temperature_c: h.temperature_c })
                .collect()
        })
        .unwrap_or_default()
}

pub fn daily_series(snapshot: &WeatherSnapshot) -> DailySeries {
    let (max, min) = snapshot
        .days
        .iter()
        .map(|d| {
            (
                DailyPoint { date: d.date, temperature_c: d.max_temp_c },
                DailyPoint { date: d.date, temperature_c: d.min_temp_c },
            )
        })
        .unzip();

    DailySeries { max, min }
}

pub fn calendar_tiles(snapshot: &WeatherSnapshot) -> Vec<CalendarTile> {
    snapshot
        .days
        .iter()
        .map(|d| CalendarTile {
            date: d.date,
            glyph: Glyph::from_condition(&d.condition),
            avg_temp_c: round_temp(d.avg_temp_c),
        })
        .collect()
}

/// Tile content for one calendar date, if the forecast covers it.
pub fn tile_for(snapshot: &WeatherSnapshot, date: NaiveDate) -> Option<CalendarTile> {
    calendar_tiles(snapshot).into_iter().find(|t| t.date == date)
}

pub fn current_panel(snapshot: &WeatherSnapshot) -> CurrentPanel {
    let current = &snapshot.current;
    CurrentPanel {
        city: snapshot.location.name.clone(),
        place: snapshot.location.display_name(),
        temperature_c: round_temp(current.temperature_c),
        condition: current.condition.clone(),
        glyph: Glyph::from_condition(&current.condition),
        wind_kph: current.wind_kph,
        humidity_pct: current.humidity_pct,
        uv_index: current.uv_index,
    }
}

fn round_temp(t: f64) -> i64 {
    t.round() as i64
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, NaiveDate, Utc};

    use crate::model::{
        CurrentConditions, DailyForecast, HourlyForecast, Location, WeatherSnapshot,
    };

    pub fn snapshot(city: &str, temp: f64) -> WeatherSnapshot {
        let start = NaiveDate::from_ymd_opt(2025, 3, 25).expect("valid date");

        let days = (0..7)
            .map(|i| {
                let date = start + Duration::days(i);
                let hours = if i == 0 {
                    (0..24)
                        .map(|h| HourlyForecast {
                            time: date.and_hms_opt(h, 0, 0).expect("valid hour"),
                            temperature_c: temp + f64::from(h) / 2.0,
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                DailyForecast {
                    date,
                    min_temp_c: temp - 3.0 + i as f64,
                    max_temp_c: temp + 3.0 + i as f64,
                    avg_temp_c: temp + i as f64,
                    condition: if i % 2 == 0 { "Sunny".into() } else { "Light rain".into() },
                    chance_of_rain_pct: None,
                    uv_index: None,
                    hours,
                }
            })
            .collect();

        WeatherSnapshot {
            location: Location {
                name: city.to_string(),
                region: String::new(),
                country: String::new(),
                latitude: 0.0,
                longitude: 0.0,
                timezone: None,
                local_time: None,
            },
            current: CurrentConditions {
                temperature_c: temp,
                feels_like_c: temp,
                humidity_pct: 50,
                wind_kph: 10.0,
                wind_dir: None,
                uv_index: 2.0,
                is_day: true,
                condition: "Partly cloudy".into(),
                observed_at: None,
                air_quality: None,
            },
            days,
            fetched_at: Utc::now(),
        }
    }
}
