//! Mock crypto source — fixture data behind a simulated network delay.
//!
//! Stands in for a CoinGecko-style API.

use super::CryptoSnapshot;
use crate::error::FetchError;
use crate::shared::AssetId;
use chrono::Utc;
use std::time::Duration;

const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

/// Mock crypto API with configurable latency.
#[derive(Debug, Clone)]
pub struct MockCryptoApi {
    latency: Duration,
}

impl Default for MockCryptoApi {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }
}

impl MockCryptoApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// The asset ids the fixture data covers.
    pub fn default_assets() -> Vec<AssetId> {
        vec![
            AssetId::from("bitcoin"),
            AssetId::from("ethereum"),
            AssetId::from("cardano"),
        ]
    }

    /// Fetch the current snapshot for one asset.
    pub async fn fetch(&self, asset_id: &AssetId) -> Result<CryptoSnapshot, FetchError> {
        tokio::time::sleep(self.latency).await;
        fixture(asset_id).ok_or_else(|| FetchError::UnknownAsset(asset_id.to_string()))
    }
}

fn fixture(asset_id: &AssetId) -> Option<CryptoSnapshot> {
    let now = Utc::now();
    let snap = match asset_id.as_str() {
        "bitcoin" => CryptoSnapshot {
            id: asset_id.clone(),
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            price: 42568.23,
            price_change_percent: 2.34,
            volume: 32_567_890_123.0,
            market_cap: 824_567_890_123.0,
            last_updated: now,
            high_24h: Some(43125.76),
            low_24h: Some(41890.12),
            image: Some("https://assets.coingecko.com/coins/images/1/large/bitcoin.png".to_string()),
        },
        "ethereum" => CryptoSnapshot {
            id: asset_id.clone(),
            name: "Ethereum".to_string(),
            symbol: "ETH".to_string(),
            price: 2344.56,
            price_change_percent: -1.23,
            volume: 15_678_901_234.0,
            market_cap: 278_901_234_567.0,
            last_updated: now,
            high_24h: Some(2390.45),
            low_24h: Some(2330.12),
            image: Some("https://assets.coingecko.com/coins/images/279/large/ethereum.png".to_string()),
        },
        "cardano" => CryptoSnapshot {
            id: asset_id.clone(),
            name: "Cardano".to_string(),
            symbol: "ADA".to_string(),
            price: 0.45,
            price_change_percent: 3.76,
            volume: 1_234_567_890.0,
            market_cap: 15_678_901_234.0,
            last_updated: now,
            high_24h: Some(0.47),
            low_24h: Some(0.44),
            image: Some("https://assets.coingecko.com/coins/images/975/large/cardano.png".to_string()),
        },
        _ => return None,
    };
    Some(snap)
}
