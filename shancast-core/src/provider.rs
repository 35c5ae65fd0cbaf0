use crate::{Config, FetchError, WeatherSnapshot, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Source of weather snapshots.
///
/// Implementations issue one upstream request per call and never cache;
/// deduplication and retry are up to the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = WeatherApiProvider::builder(api_key.to_owned())
        .base_url(config.base_url.clone())
        .forecast_days(config.forecast_days)
        .timeout(config.timeout())
        .build()?;

    Ok(Arc::new(provider))
}
