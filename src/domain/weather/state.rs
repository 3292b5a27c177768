//! Weather state container — app-owned, SDK-provided update logic.

use super::WeatherSnapshot;
use crate::domain::lifecycle::FetchLifecycle;
use crate::shared::CityId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Per-city snapshot map plus the fetch lifecycle for the weather domain.
///
/// The `Dashboard` owns one instance behind a lock; all mutation goes through
/// the transition methods below, never field-by-field.
#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    data: HashMap<CityId, WeatherSnapshot>,
    tracked: Vec<CityId>,
    lifecycle: FetchLifecycle,
}

impl WeatherState {
    pub fn new(tracked: Vec<CityId>) -> Self {
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

    /// Fulfilled: merge the batch into the map atomically and advance
    /// `last_updated`. A superseded epoch merges nothing.
    pub fn fulfill(&mut self, epoch: u64, snapshots: Vec<WeatherSnapshot>) -> bool {
        if !self.lifecycle.finish(epoch) {
            return false;
        }
        for snap in snapshots {
            self.data.insert(snap.city_id.clone(), snap);
        }
        true
    }

    /// Rejected: record the error, leave prior data untouched.
    pub fn reject(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        self.lifecycle.fail(epoch, message)
    }

    /// Idempotent add to the tracked set.
    pub fn track(&mut self, id: CityId) {
        if !self.tracked.contains(&id) {
            self.tracked.push(id);
        }
    }

    /// Remove from the tracked set and evict the snapshot.
    pub fn untrack(&mut self, id: &CityId) {
        self.tracked.retain(|t| t != id);
        self.data.remove(id);
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn get(&self, id: &CityId) -> Option<&WeatherSnapshot> {
        self.data.get(id)
    }

    pub fn snapshots(&self) -> &HashMap<CityId, WeatherSnapshot> {
        &self.data
    }

    pub fn tracked(&self) -> &[CityId] {
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
