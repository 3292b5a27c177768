//! The process-wide state container — `Dashboard`.
//!
//! Owns every domain state exclusively. The live feed, the fetch
//! orchestration, and the UI layer all go through the typed operations here;
//! nothing mutates a snapshot field-by-field from outside.
//!
//! Fetches follow the three-phase lifecycle (pending → fulfilled | rejected)
//! with per-domain single-flight: a new fetch supersedes any in-flight one of
//! the same domain, whose results are then discarded. Batch fetches retrieve
//! sequentially per tracked id and merge atomically at completion, so readers
//! see either the pre-fetch map or the fully-merged one, never a partial
//! merge.

use crate::domain::crypto::source::MockCryptoApi;
use crate::domain::crypto::state::CryptoState;
use crate::domain::crypto::CryptoSnapshot;
use crate::domain::notifications::state::NotificationLog;
use crate::domain::notifications::NewNotification;
use crate::domain::preferences::store::PreferencesStore;
use crate::domain::weather::source::MockWeatherApi;
use crate::domain::weather::state::WeatherState;
use crate::domain::weather::WeatherSnapshot;
use crate::shared::{AssetId, CityId, Theme};
use crate::storage::{MemoryStorage, Storage};

use async_lock::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// The single state container every component reads and writes through.
///
/// Cheap to clone; clones share the same underlying state.
pub struct Dashboard {
    weather: Arc<RwLock<WeatherState>>,
    crypto: Arc<RwLock<CryptoState>>,
    notifications: Arc<RwLock<NotificationLog>>,
    preferences: Arc<RwLock<PreferencesStore>>,
    weather_api: MockWeatherApi,
    crypto_api: MockCryptoApi,
}

impl Dashboard {
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::default()
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn weather(&self) -> RwLockReadGuard<'_, WeatherState> {
        self.weather.read().await
    }

    pub async fn crypto(&self) -> RwLockReadGuard<'_, CryptoState> {
        self.crypto.read().await
    }

    pub async fn notifications(&self) -> RwLockReadGuard<'_, NotificationLog> {
        self.notifications.read().await
    }

    pub async fn preferences(&self) -> RwLockReadGuard<'_, PreferencesStore> {
        self.preferences.read().await
    }

    // ── Weather fetches ──────────────────────────────────────────────────

    /// Fetch one city. Failures surface as the domain's error string, never
    /// as a panic or a propagated error.
    pub async fn fetch_weather(&self, id: &CityId) {
        let epoch = self.weather.write().await.begin_fetch();
        match self.weather_api.fetch(id).await {
            Ok(snap) => {
                self.weather.write().await.fulfill(epoch, vec![snap]);
            }
            Err(e) => {
                self.weather.write().await.reject(epoch, e.to_string());
            }
        }
    }

    /// Fetch every tracked city, sequentially, merging at completion.
    pub async fn fetch_all_weather(&self) {
        let (epoch, ids) = {
            let mut state = self.weather.write().await;
            (state.begin_fetch(), state.tracked().to_vec())
        };

        let mut batch: Vec<WeatherSnapshot> = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.weather_api.fetch(id).await {
                Ok(snap) => batch.push(snap),
                Err(e) => {
                    self.weather.write().await.reject(epoch, e.to_string());
                    return;
                }
            }
        }
        self.weather.write().await.fulfill(epoch, batch);
    }

    // ── Crypto fetches ───────────────────────────────────────────────────

    pub async fn fetch_crypto(&self, id: &AssetId) {
        let epoch = self.crypto.write().await.begin_fetch();
        match self.crypto_api.fetch(id).await {
            Ok(snap) => {
                self.crypto.write().await.fulfill(epoch, vec![snap]);
            }
            Err(e) => {
                self.crypto.write().await.reject(epoch, e.to_string());
            }
        }
    }

    pub async fn fetch_all_cryptos(&self) {
        let (epoch, ids) = {
            let mut state = self.crypto.write().await;
            (state.begin_fetch(), state.tracked().to_vec())
        };

        let mut batch: Vec<CryptoSnapshot> = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.crypto_api.fetch(id).await {
                Ok(snap) => batch.push(snap),
                Err(e) => {
                    self.crypto.write().await.reject(epoch, e.to_string());
                    return;
                }
            }
        }
        self.crypto.write().await.fulfill(epoch, batch);
    }

    /// Partial price update from the live feed. No-op for ids without a
    /// snapshot; never touches loading or error.
    pub async fn apply_price_update(&self, id: &AssetId, price: f64) -> bool {
        self.crypto.write().await.apply_price_update(id, price)
    }

    // ── Tracked ids ──────────────────────────────────────────────────────

    pub async fn track_city(&self, id: CityId) {
        self.weather.write().await.track(id);
    }

    pub async fn untrack_city(&self, id: &CityId) {
        self.weather.write().await.untrack(id);
    }

    pub async fn track_crypto(&self, id: AssetId) {
        self.crypto.write().await.track(id);
    }

    pub async fn untrack_crypto(&self, id: &AssetId) {
        self.crypto.write().await.untrack(id);
    }

    // ── Notifications ────────────────────────────────────────────────────

    pub async fn notify(&self, entry: NewNotification) -> Uuid {
        self.notifications.write().await.append(entry)
    }

    pub async fn mark_notification_read(&self, id: Uuid) {
        self.notifications.write().await.mark_read(id);
    }

    pub async fn mark_all_notifications_read(&self) {
        self.notifications.write().await.mark_all_read();
    }

    pub async fn remove_notification(&self, id: Uuid) {
        self.notifications.write().await.remove(id);
    }

    pub async fn clear_notifications(&self) {
        self.notifications.write().await.clear();
    }

    // ── Preferences ──────────────────────────────────────────────────────

    pub async fn toggle_favorite_city(&self, id: CityId) -> bool {
        self.preferences.write().await.toggle_favorite_city(id)
    }

    pub async fn toggle_favorite_crypto(&self, id: AssetId) -> bool {
        self.preferences.write().await.toggle_favorite_crypto(id)
    }

    pub async fn set_refresh_interval(&self, seconds: u32) {
        self.preferences.write().await.set_refresh_interval(seconds);
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.preferences.write().await.set_theme(theme);
    }
}

impl Clone for Dashboard {
    fn clone(&self) -> Self {
        Self {
            weather: self.weather.clone(),
            crypto: self.crypto.clone(),
            notifications: self.notifications.clone(),
            preferences: self.preferences.clone(),
            weather_api: self.weather_api.clone(),
            crypto_api: self.crypto_api.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DashboardBuilder {
    storage: Arc<dyn Storage>,
    tracked_cities: Vec<CityId>,
    tracked_assets: Vec<AssetId>,
    weather_latency: Option<Duration>,
    crypto_latency: Option<Duration>,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            tracked_cities: MockWeatherApi::default_cities(),
            tracked_assets: MockCryptoApi::default_assets(),
            weather_latency: None,
            crypto_latency: None,
        }
    }
}

impl DashboardBuilder {
    /// Backing storage for preferences (defaults to in-memory).
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn tracked_cities(mut self, ids: Vec<CityId>) -> Self {
        self.tracked_cities = ids;
        self
    }

    pub fn tracked_assets(mut self, ids: Vec<AssetId>) -> Self {
        self.tracked_assets = ids;
        self
    }

    /// Override the simulated network latency of the weather source.
    pub fn weather_latency(mut self, latency: Duration) -> Self {
        self.weather_latency = Some(latency);
        self
    }

    /// Override the simulated network latency of the crypto source.
    pub fn crypto_latency(mut self, latency: Duration) -> Self {
        self.crypto_latency = Some(latency);
        self
    }

    /// Build the container, loading preferences from storage.
    pub fn build(self) -> Dashboard {
        let weather_api = match self.weather_latency {
            Some(latency) => MockWeatherApi::with_latency(latency),
            None => MockWeatherApi::new(),
        };
        let crypto_api = match self.crypto_latency {
            Some(latency) => MockCryptoApi::with_latency(latency),
            None => MockCryptoApi::new(),
        };

        Dashboard {
            weather: Arc::new(RwLock::new(WeatherState::new(self.tracked_cities))),
            crypto: Arc::new(RwLock::new(CryptoState::new(self.tracked_assets))),
            notifications: Arc::new(RwLock::new(NotificationLog::new())),
            preferences: Arc::new(RwLock::new(PreferencesStore::load(self.storage))),
            weather_api,
            crypto_api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn instant_dashboard() -> Dashboard {
        Dashboard::builder()
            .weather_latency(Duration::ZERO)
            .crypto_latency(Duration::ZERO)
            .build()
    }

    #[tokio::test]
    async fn test_fetch_one_crypto_success() {
        let dashboard = instant_dashboard();
        let before = Utc::now();
        dashboard.fetch_crypto(&AssetId::from("bitcoin")).await;

        let crypto = dashboard.crypto().await;
        assert!(!crypto.is_loading());
        assert_eq!(crypto.error(), None);
        let snap = crypto.get(&AssetId::from("bitcoin")).unwrap();
        assert_eq!(snap.symbol, "BTC");
        assert!(crypto.last_updated().unwrap() >= before);
    }

    #[tokio::test]
    async fn test_fetch_all_cryptos_from_empty_map() {
        let dashboard = instant_dashboard();
        dashboard.fetch_all_cryptos().await;

        let crypto = dashboard.crypto().await;
        assert_eq!(crypto.len(), 3);
        assert!(!crypto.is_loading());
        assert_eq!(crypto.error(), None);
        for id in ["bitcoin", "ethereum", "cardano"] {
            assert!(crypto.get(&AssetId::from(id)).is_some());
        }
    }

    #[tokio::test]
    async fn test_fetch_unknown_city_rejects_without_storing() {
        let dashboard = instant_dashboard();
        dashboard.fetch_weather(&CityId::from("doesnotexist")).await;

        let weather = dashboard.weather().await;
        assert!(!weather.is_loading());
        assert_eq!(weather.error(), Some("Unknown city: doesnotexist"));
        assert!(weather.get(&CityId::from("doesnotexist")).is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_batch_on_any_failure() {
        let dashboard = Dashboard::builder()
            .crypto_latency(Duration::ZERO)
            .tracked_assets(vec![AssetId::from("bitcoin"), AssetId::from("unknowncoin")])
            .build();
        dashboard.fetch_all_cryptos().await;

        let crypto = dashboard.crypto().await;
        assert!(!crypto.is_loading());
        assert_eq!(crypto.error(), Some("Unknown asset: unknowncoin"));
        assert!(crypto.is_empty(), "a rejected batch must not merge partial results");
    }

    #[tokio::test]
    async fn test_fetch_all_weather_tracked_cities() {
        let dashboard = instant_dashboard();
        dashboard.fetch_all_weather().await;

        let weather = dashboard.weather().await;
        assert_eq!(weather.len(), 3);
        assert_eq!(weather.get(&CityId::from("2643743")).unwrap().city_name, "London");
    }

    #[tokio::test]
    async fn test_price_update_for_untracked_id_is_noop() {
        let dashboard = instant_dashboard();
        assert!(!dashboard.apply_price_update(&AssetId::from("bitcoin"), 1.0).await);
        assert!(dashboard.crypto().await.is_empty());
    }

    #[tokio::test]
    async fn test_untrack_then_fetch_all_skips_city() {
        let dashboard = instant_dashboard();
        dashboard.untrack_city(&CityId::from("2643743")).await;
        dashboard.fetch_all_weather().await;

        let weather = dashboard.weather().await;
        assert_eq!(weather.len(), 2);
        assert!(weather.get(&CityId::from("2643743")).is_none());
    }

    #[tokio::test]
    async fn test_preference_mutations_share_one_record() {
        let dashboard = instant_dashboard();
        assert!(dashboard.toggle_favorite_crypto(AssetId::from("bitcoin")).await);
        dashboard.set_theme(Theme::Dark).await;

        let clone = dashboard.clone();
        let prefs = clone.preferences().await;
        assert!(prefs.get().is_favorite_crypto(&AssetId::from("bitcoin")));
        assert_eq!(prefs.get().theme, Theme::Dark);
    }
}
