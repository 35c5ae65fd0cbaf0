use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved location as reported by the upstream provider.
///
/// `name` is the canonical name the provider resolved the query to, which is
/// not necessarily the string the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub local_time: Option<NaiveDateTime>,
}

impl Location {
    pub fn display_name(&self) -> String {
        match (self.region.is_empty(), self.country.is_empty()) {
            (false, false) => format!("{}, {}, {}", self.name, self.region, self.country),
            (true, false) => format!("{}, {}", self.name, self.country),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    /// US EPA index, 1 (good) to 6 (hazardous).
    pub us_epa_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub wind_dir: Option<String>,
    pub uv_index: f64,
    pub is_day: bool,
    /// Provider condition label, e.g. "Partly cloudy".
    pub condition: String,
    pub observed_at: Option<DateTime<Utc>>,
    pub air_quality: Option<AirQuality>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Local wall-clock time at the location.
    pub time: NaiveDateTime,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub avg_temp_c: f64,
    pub condition: String,
    pub chance_of_rain_pct: Option<u8>,
    pub uv_index: Option<f64>,
    pub hours: Vec<HourlyForecast>,
}

/// Full current + forecast result for one location at one fetch.
///
/// Immutable once built; a newer fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub days: Vec<DailyForecast>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn first_day(&self) -> Option<&DailyForecast> {
        self.days.first()
    }
}
