//! Crypto domain — asset snapshots, state container, mock source.
//!
//! Unlike weather, crypto snapshots are mutated two ways: wholesale replace
//! on fetch, and a partial price-only update pushed by the live feed.

pub mod source;
pub mod state;

use crate::shared::AssetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The latest known state of one tracked crypto asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoSnapshot {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub price_change_percent: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub last_updated: DateTime<Utc>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub image: Option<String>,
}
