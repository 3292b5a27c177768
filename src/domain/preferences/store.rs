//! Preferences store — in-memory record plus write-through persistence.

use super::{Preferences, PREFERENCES_KEY};
use crate::shared::{AssetId, CityId, Theme};
use crate::storage::Storage;
use std::sync::Arc;

/// The preference record and its backing storage.
///
/// Loaded once at construction; every mutation commits in memory first and
/// then re-persists the whole record synchronously, so the persisted blob is
/// always consistent with the last committed change.
pub struct PreferencesStore {
    prefs: Preferences,
    storage: Arc<dyn Storage>,
}

impl PreferencesStore {
    /// Load from storage, degrading silently to defaults when the blob is
    /// missing or malformed. Never fatal.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let prefs = match storage.load(PREFERENCES_KEY) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!("Malformed preferences blob, falling back to defaults: {e}");
                    Preferences::default()
                }
            },
            Ok(None) => Preferences::default(),
            Err(e) => {
                tracing::warn!("Failed to load preferences, falling back to defaults: {e}");
                Preferences::default()
            }
        };
        Self { prefs, storage }
    }

    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    // ── Mutations (each persists the full record) ────────────────────────

    pub fn toggle_favorite_city(&mut self, id: CityId) -> bool {
        let now_favorite = self.prefs.toggle_favorite_city(id);
        self.persist();
        now_favorite
    }

    pub fn toggle_favorite_crypto(&mut self, id: AssetId) -> bool {
        let now_favorite = self.prefs.toggle_favorite_crypto(id);
        self.persist();
        now_favorite
    }

    pub fn set_refresh_interval(&mut self, seconds: u32) {
        self.prefs.set_refresh_interval(seconds);
        self.persist();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.set_theme(theme);
        self.persist();
    }

    /// Persist the whole record, not a delta. Failures are logged and
    /// swallowed: persistence is best-effort, in-memory state is the truth.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.prefs) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to serialize preferences: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.store(PREFERENCES_KEY, &blob) {
            tracing::warn!("Failed to persist preferences: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_round_trip_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = PreferencesStore::load(storage.clone());
        store.toggle_favorite_city(CityId::from("2643743"));
        store.toggle_favorite_crypto(AssetId::from("bitcoin"));
        store.set_refresh_interval(120);
        store.set_theme(Theme::Dark);

        let reloaded = PreferencesStore::load(storage);
        assert_eq!(reloaded.get(), store.get());
        assert_eq!(reloaded.get().refresh_interval, 120);
        assert_eq!(reloaded.get().theme, Theme::Dark);
    }

    #[test]
    fn test_missing_blob_yields_defaults() {
        let store = PreferencesStore::load(Arc::new(MemoryStorage::new()));
        assert_eq!(store.get(), &Preferences::default());
    }

    #[test]
    fn test_malformed_blob_yields_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store(PREFERENCES_KEY, "{not json").unwrap();
        let store = PreferencesStore::load(storage);
        assert_eq!(store.get(), &Preferences::default());
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = PreferencesStore::load(storage.clone());

        store.set_theme(Theme::Light);
        let blob = storage.load(PREFERENCES_KEY).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(parsed["theme"], "light");

        store.toggle_favorite_city(CityId::from("1850147"));
        let blob = storage.load(PREFERENCES_KEY).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(parsed["favoriteCities"][0], "1850147");
        assert_eq!(parsed["theme"], "light");
    }
}
