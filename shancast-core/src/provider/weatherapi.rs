use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::{fmt, time::Duration};
use tracing::{debug, instrument};

use crate::{
    FetchError,
    model::{AirQuality, CurrentConditions, DailyForecast, HourlyForecast, Location, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Client for the WeatherAPI.com `forecast.json` endpoint.
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    forecast_days: u8,
    http: Client,
}

// Hand-written so the key never ends up in logs.
impl fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("base_url", &self.base_url)
            .field("forecast_days", &self.forecast_days)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct WeatherApiProviderBuilder {
    api_key: String,
    base_url: String,
    forecast_days: u8,
    timeout: Duration,
}

impl WeatherApiProviderBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Clamped to the 1..=14 range the API accepts.
    pub fn forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days.clamp(1, 14);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<WeatherApiProvider, FetchError> {
        let http = Client::builder().timeout(self.timeout).build()?;

        Ok(WeatherApiProvider {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            forecast_days: self.forecast_days,
            http,
        })
    }
}

impl WeatherApiProvider {
    pub fn builder(api_key: String) -> WeatherApiProviderBuilder {
        WeatherApiProviderBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_days: 7,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn new(api_key: String) -> Result<Self, FetchError> {
        Self::builder(api_key).build()
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self), fields(days = self.forecast_days))]
    async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, FetchError> {
        let url = format!("{}/forecast.json", self.base_url);
        let days = self.forecast_days.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "yes"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::status(status, &body));
        }

        debug!(bytes = body.len(), "received forecast payload");
        parse_forecast(&body)
    }
}

/// Decode a `forecast.json` body into a snapshot.
///
/// Only `location.name` is mandatory. Missing sections become defaults or
/// empty sequences, and entries whose date or time can't be parsed are dropped.
pub fn parse_forecast(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let parsed: WaForecastResponse = serde_json::from_str(body)?;
    Ok(parsed.into_snapshot(Utc::now()))
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    #[serde(default)]
    current: WaCurrent,
    #[serde(default)]
    forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    tz_id: Option<String>,
    localtime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaCurrent {
    last_updated_epoch: Option<i64>,
    temp_c: f64,
    feelslike_c: f64,
    is_day: u8,
    condition: WaCondition,
    wind_kph: f64,
    wind_dir: Option<String>,
    humidity: u8,
    uv: f64,
    air_quality: Option<WaAirQuality>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaAirQuality {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    o3: Option<f64>,
    no2: Option<f64>,
    #[serde(rename = "us-epa-index")]
    us_epa_index: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    #[serde(default)]
    day: WaDay,
    #[serde(default)]
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    condition: WaCondition,
    daily_chance_of_rain: Option<u8>,
    uv: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    #[serde(default)]
    temp_c: f64,
}

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn parse_local_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), LOCAL_TIME_FORMAT).ok()
}

impl WaForecastResponse {
    fn into_snapshot(self, fetched_at: DateTime<Utc>) -> WeatherSnapshot {
        let location = Location {
            name: self.location.name,
            region: self.location.region,
            country: self.location.country,
            latitude: self.location.lat,
            longitude: self.location.lon,
            timezone: self.location.tz_id,
            local_time: self.location.localtime.as_deref().and_then(parse_local_time),
        };

        let current = CurrentConditions {
            temperature_c: self.current.temp_c,
            feels_like_c: self.current.feelslike_c,
            humidity_pct: self.current.humidity,
            wind_kph: self.current.wind_kph,
            wind_dir: self.current.wind_dir,
            uv_index: self.current.uv,
            is_day: self.current.is_day != 0,
            condition: self.current.condition.text,
            observed_at: self
                .current
                .last_updated_epoch
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            air_quality: self.current.air_quality.map(|aq| AirQuality {
                pm2_5: aq.pm2_5,
                pm10: aq.pm10,
                o3: aq.o3,
                no2: aq.no2,
                us_epa_index: aq.us_epa_index,
            }),
        };

        let days = self.forecast.forecastday.into_iter().filter_map(WaForecastDay::into_daily).collect();

        WeatherSnapshot { location, current, days, fetched_at }
    }
}

impl WaForecastDay {
    fn into_daily(self) -> Option<DailyForecast> {
        let date = match NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(err) => {
                debug!(raw = %self.date, %err, "dropping forecast day with unparseable date");
                return None;
            }
        };

        let hours = self
            .hour
            .into_iter()
            .filter_map(|h| {
                parse_local_time(&h.time)
                    .map(|time| HourlyForecast { time, temperature_c: h.temp_c })
            })
            .collect();

        Some(DailyForecast {
            date,
            min_temp_c: self.day.mintemp_c,
            max_temp_c: self.day.maxtemp_c,
            avg_temp_c: self.day.avgtemp_c,
            condition: self.day.condition.text,
            chance_of_rain_pct: self.day.daily_chance_of_rain,
            uv_index: self.day.uv,
            hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Timelike};

    const SAMPLE: &str = r#"{
        "location": {
            "name": "London", "region": "City of London, Greater London",
            "country": "United Kingdom", "lat": 51.52, "lon": -0.11,
            "tz_id": "Europe/London", "localtime": "2025-03-25 14:05"
        },
        "current": {
            "last_updated_epoch": 1742911200, "temp_c": 12.3, "feelslike_c": 10.9,
            "is_day": 1, "condition": { "text": "Partly cloudy", "code": 1003 },
            "wind_kph": 15.5, "wind_dir": "WSW", "humidity": 62, "uv": 3.0,
            "air_quality": { "pm2_5": 7.4, "pm10": 11.2, "us-epa-index": 1 }
        },
        "forecast": { "forecastday": [
            { "date": "2025-03-25",
              "day": { "maxtemp_c": 14.1, "mintemp_c": 6.2, "avgtemp_c": 10.0,
                       "condition": { "text": "Patchy rain nearby" }, "daily_chance_of_rain": 70 },
              "hour": [
                { "time": "2025-03-25 00:00", "temp_c": 7.1 },
                { "time": "2025-03-25 01:00", "temp_c": 6.8 },
                { "time": "garbage", "temp_c": 0.0 }
              ] },
            { "date": "2025-03-26",
              "day": { "maxtemp_c": 15.0, "mintemp_c": 7.0, "avgtemp_c": 11.2,
                       "condition": { "text": "Sunny" } } }
        ] }
    }"#;

    #[test]
    fn parses_full_payload() {
        let snap = parse_forecast(SAMPLE).expect("sample should parse");

        assert_eq!(snap.location.name, "London");
        assert_eq!(snap.location.timezone.as_deref(), Some("Europe/London"));
        assert_eq!(snap.current.humidity_pct, 62);
        assert!(snap.current.is_day);
        assert_eq!(snap.current.condition, "Partly cloudy");
        assert_eq!(snap.current.air_quality.as_ref().and_then(|aq| aq.us_epa_index), Some(1));
        assert!(snap.current.observed_at.is_some());

        assert_eq!(snap.days.len(), 2);
        assert_eq!(snap.days[0].chance_of_rain_pct, Some(70));
        assert_eq!(snap.days[1].chance_of_rain_pct, None);
    }

    #[test]
    fn unparseable_hours_are_dropped() {
        let snap = parse_forecast(SAMPLE).expect("sample should parse");
        let hours = &snap.days[0].hours;

        assert_eq!(hours.len(), 2);
        assert_eq!(hours[1].time.time(), NaiveTime::from_hms_opt(1, 0, 0).expect("valid time"));
        assert_eq!(hours[1].time.hour(), 1);
        assert!(snap.days[1].hours.is_empty());
    }

    #[test]
    fn missing_forecast_yields_empty_days() {
        let body = r#"{ "location": { "name": "Tokyo" }, "current": { "temp_c": 18.0 } }"#;
        let snap = parse_forecast(body).expect("partial payload should parse");

        assert_eq!(snap.location.name, "Tokyo");
        assert!(snap.days.is_empty());
        assert!(snap.current.air_quality.is_none());
        assert_eq!(snap.current.condition, "");
    }

    #[test]
    fn missing_location_is_a_decode_error() {
        let err = parse_forecast(r#"{ "current": {} }"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn bad_day_dates_are_dropped() {
        let body = r#"{
            "location": { "name": "Paris" },
            "forecast": { "forecastday": [
                { "date": "not-a-date" },
                { "date": "2025-03-26", "day": { "maxtemp_c": 9.0 } }
            ] }
        }"#;
        let snap = parse_forecast(body).expect("payload should parse");

        assert_eq!(snap.days.len(), 1);
        assert_eq!(snap.days[0].max_temp_c, 9.0);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider = WeatherApiProvider::new("super-secret".to_string()).expect("client builds");
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("api.weatherapi.com"));
    }

    #[test]
    fn builder_clamps_days_and_trims_base_url() {
        let provider = WeatherApiProvider::builder("k".to_string())
            .base_url("http://localhost:1234/v1/")
            .forecast_days(40)
            .build()
            .expect("client builds");

        assert_eq!(provider.base_url, "http://localhost:1234/v1");
        assert_eq!(provider.forecast_days, 14);
    }
}
