//! Weather domain — city snapshots, forecast, state container, mock source.
//!
//! Weather receives no partial live updates: snapshots are replaced wholesale
//! on fetch, never field-by-field. Only the crypto domain has push updates.

pub mod source;
pub mod state;

use crate::shared::CityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The latest known weather for one tracked city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_id: CityId,
    pub city_name: String,
    pub country: String,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

/// One entry of the short-range forecast attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: DateTime<Utc>,
    pub temp: f64,
    pub description: String,
    pub icon: String,
}
