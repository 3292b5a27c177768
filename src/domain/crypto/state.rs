//! Crypto state container — app-owned, SDK-provided update logic.

use super::CryptoSnapshot;
use crate::domain::lifecycle::FetchLifecycle;
use crate::shared::AssetId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Per-asset snapshot map plus the fetch lifecycle for the crypto domain.
#[derive(Debug, Clone, Default)]
pub struct CryptoState {
    data: HashMap<AssetId, CryptoSnapshot>,
    tracked: Vec<AssetId>,
    lifecycle: FetchLifecycle,
}

impl CryptoState {
    pub fn new(tracked: Vec<AssetId>) -> Self {
        Self {
            data: HashMap::new(),
            tracked,
            lifecycle: FetchLifecycle::new(),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Pending: loading=true, error cleared. Returns the fetch epoch.
    pub fn begin_fetch(&mut self) -> u64 {
        self.lifecycle.begin()
    }

    /// Fulfilled: merge the batch atomically, advance `last_updated`.
    pub fn fulfill(&mut self, epoch: u64, snapshots: Vec<CryptoSnapshot>) -> bool {
        if !self.lifecycle.finish(epoch) {
            return false;
        }
        for snap in snapshots {
            self.data.insert(snap.id.clone(), snap);
        }
        true
    }

    /// Rejected: record the error, leave prior data untouched.
    pub fn reject(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        self.lifecycle.fail(epoch, message)
    }

    /// Partial update from the live feed: price and the snapshot's own
    /// `last_updated` only. Everything else — including loading/error —
    /// stays exactly as it was. No-op when the asset has no snapshot.
    pub fn apply_price_update(&mut self, id: &AssetId, price: f64) -> bool {
        match self.data.get_mut(id) {
            Some(snap) => {
                snap.price = price;
                snap.last_updated = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Idempotent add to the tracked set.
    pub fn track(&mut self, id: AssetId) {
        if !self.tracked.contains(&id) {
            self.tracked.push(id);
        }
    }

    /// Remove from the tracked set and evict the snapshot.
    pub fn untrack(&mut self, id: &AssetId) {
        self.tracked.retain(|t| t != id);
        self.data.remove(id);
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn get(&self, id: &AssetId) -> Option<&CryptoSnapshot> {
        self.data.get(id)
    }

    pub fn price(&self, id: &AssetId) -> Option<f64> {
        self.data.get(id).map(|s| s.price)
    }

    pub fn snapshots(&self) -> &HashMap<AssetId, CryptoSnapshot> {
        &self.data
    }

    pub fn tracked(&self) -> &[AssetId] {
        &self.tracked
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.lifecycle.error()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.last_updated()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, name: &str, symbol: &str, price: f64) -> CryptoSnapshot {
        CryptoSnapshot {
            id: AssetId::from(id),
            name: name.to_string(),
            symbol: symbol.to_string(),
            price,
            price_change_percent: 2.34,
            volume: 32_567_890_123.0,
            market_cap: 824_567_890_123.0,
            last_updated: Utc::now(),
            high_24h: Some(price * 1.01),
            low_24h: Some(price * 0.99),
            image: None,
        }
    }

    #[test]
    fn test_fulfill_merges_batch() {
        let mut state = CryptoState::new(vec![AssetId::from("bitcoin")]);
        let epoch = state.begin_fetch();
        state.fulfill(epoch, vec![snapshot("bitcoin", "Bitcoin", "BTC", 42568.23)]);
        assert!(!state.is_loading());
        assert_eq!(state.price(&AssetId::from("bitcoin")), Some(42568.23));
    }

    #[test]
    fn test_apply_price_update_absent_id_is_noop() {
        let mut state = CryptoState::new(vec![AssetId::from("bitcoin")]);
        assert!(!state.apply_price_update(&AssetId::from("bitcoin"), 43000.0));
        assert!(state.is_empty());
    }

    #[test]
    fn test_apply_price_update_touches_price_only() {
        let mut state = CryptoState::new(vec![AssetId::from("bitcoin")]);
        let epoch = state.begin_fetch();
        state.fulfill(epoch, vec![snapshot("bitcoin", "Bitcoin", "BTC", 42568.23)]);
        let before = state.get(&AssetId::from("bitcoin")).unwrap().clone();

        assert!(state.apply_price_update(&AssetId::from("bitcoin"), 42908.78));

        let after = state.get(&AssetId::from("bitcoin")).unwrap();
        assert_eq!(after.price, 42908.78);
        assert!(after.last_updated >= before.last_updated);
        assert_eq!(after.name, before.name);
        assert_eq!(after.volume, before.volume);
        assert_eq!(after.market_cap, before.market_cap);
        assert_eq!(after.price_change_percent, before.price_change_percent);
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_price_update_does_not_clear_error() {
        let mut state = CryptoState::new(vec![AssetId::from("bitcoin")]);
        let epoch = state.begin_fetch();
        state.fulfill(epoch, vec![snapshot("bitcoin", "Bitcoin", "BTC", 42568.23)]);
        let epoch = state.begin_fetch();
        state.reject(epoch, "Failed to fetch crypto data");

        state.apply_price_update(&AssetId::from("bitcoin"), 43000.0);
        assert_eq!(state.error(), Some("Failed to fetch crypto data"));
    }

    #[test]
    fn test_untrack_evicts_snapshot() {
        let mut state = CryptoState::new(vec![AssetId::from("bitcoin")]);
        let epoch = state.begin_fetch();
        state.fulfill(epoch, vec![snapshot("bitcoin", "Bitcoin", "BTC", 42568.23)]);

        state.untrack(&AssetId::from("bitcoin"));
        assert!(state.tracked().is_empty());
        assert!(state.get(&AssetId::from("bitcoin")).is_none());
        // A later tick for the evicted id must be a no-op.
        assert!(!state.apply_price_update(&AssetId::from("bitcoin"), 43000.0));
    }
}
