//! Preferences domain — favorites, refresh interval, theme.
//!
//! Persisted as one camelCase JSON record under a single fixed key, so the
//! blob layout matches what the dashboard frontend historically wrote.

pub mod store;

use crate::shared::{AssetId, CityId, Theme};
use serde::{Deserialize, Serialize};

/// Storage key for the persisted record.
pub const PREFERENCES_KEY: &str = "userPreferences";

/// Bounds for the refresh interval, in seconds.
pub const REFRESH_INTERVAL_MIN: u32 = 30;
pub const REFRESH_INTERVAL_MAX: u32 = 300;

const DEFAULT_REFRESH_INTERVAL: u32 = 60;

/// The singleton user preference record.
///
/// Favorite lists carry set semantics: toggling adds when absent, removes
/// when present. Distinct from the tracked ids of the domain stores — a
/// favorite is a user preference, not a fetch target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub favorite_cities: Vec<CityId>,
    pub favorite_cryptos: Vec<AssetId>,
    pub refresh_interval: u32,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            favorite_cities: Vec::new(),
            favorite_cryptos: Vec::new(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            theme: Theme::System,
        }
    }
}

impl Preferences {
    /// Toggle membership; returns true when the id is a favorite afterwards.
    pub fn toggle_favorite_city(&mut self, id: CityId) -> bool {
        if self.favorite_cities.contains(&id) {
            self.favorite_cities.retain(|c| c != &id);
            false
        } else {
            self.favorite_cities.push(id);
            true
        }
    }

    /// Toggle membership; returns true when the id is a favorite afterwards.
    pub fn toggle_favorite_crypto(&mut self, id: AssetId) -> bool {
        if self.favorite_cryptos.contains(&id) {
            self.favorite_cryptos.retain(|c| c != &id);
            false
        } else {
            self.favorite_cryptos.push(id);
            true
        }
    }

    /// Set the refresh interval, clamped to the documented bounds.
    pub fn set_refresh_interval(&mut self, seconds: u32) {
        self.refresh_interval = seconds.clamp(REFRESH_INTERVAL_MIN, REFRESH_INTERVAL_MAX);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn is_favorite_city(&self, id: &CityId) -> bool {
        self.favorite_cities.contains(id)
    }

    pub fn is_favorite_crypto(&self, id: &AssetId) -> bool {
        self.favorite_cryptos.contains(id)
    }
}
