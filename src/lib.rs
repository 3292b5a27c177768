//! # Skydeck SDK
//!
//! The state core of the Skydeck dashboard: domain stores for weather and
//! crypto data, a fetch lifecycle, user preferences with persistence, an
//! append-only notification log, and a simulated live-update feed.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Shared** — id newtypes, severity, theme (serialization-transparent)
//! 2. **Domain** — vertical slices: snapshot types, state containers, mock sources
//! 3. **Storage** — key-value persistence for preferences
//! 4. **Store** — `Dashboard`, the process-wide state container
//! 5. **Feed** — `LiveFeed`, the background simulator task
//!
//! All mutation flows through the `Dashboard`'s typed operations; the UI
//! layer only reads. The feed and the fetch orchestration never touch
//! snapshots directly.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skydeck_sdk::prelude::*;
//!
//! let dashboard = Dashboard::builder().build();
//! dashboard.fetch_all_cryptos().await;
//!
//! let mut feed = LiveFeed::new(dashboard.clone(), FeedConfig::default());
//! feed.start();
//! // ... later
//! feed.stop().await;
//! ```

// ── Layer 1: Shared ──────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

// ── Layer 2: Domain ──────────────────────────────────────────────────────────

/// Domain modules (vertical slices): snapshot types, state containers, sources.
pub mod domain;

/// Unified SDK error types.
pub mod error;

// ── Layer 3: Storage ─────────────────────────────────────────────────────────

/// Key-value persistence for preferences.
pub mod storage;

// ── Layer 4: Store ───────────────────────────────────────────────────────────

/// `Dashboard` — the process-wide state container.
pub mod store;

// ── Layer 5: Feed ────────────────────────────────────────────────────────────

/// Simulated live-update feed: price ticks, weather alerts, reconnect loop.
pub mod feed;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{AssetId, CityId, Severity, Theme};

    // Domain types — weather
    pub use crate::domain::weather::{ForecastDay, WeatherSnapshot};

    // Domain types — crypto
    pub use crate::domain::crypto::CryptoSnapshot;

    // Domain types — notifications
    pub use crate::domain::notifications::{NewNotification, Notification};

    // Domain types — preferences
    pub use crate::domain::preferences::Preferences;

    // Fetch lifecycle
    pub use crate::domain::lifecycle::FetchLifecycle;

    // State containers
    pub use crate::domain::crypto::state::CryptoState;
    pub use crate::domain::notifications::state::NotificationLog;
    pub use crate::domain::weather::state::WeatherState;

    // Errors
    pub use crate::error::{FetchError, SdkError, StorageError};

    // Storage
    pub use crate::storage::{FileStorage, MemoryStorage, Storage};

    // The state container
    pub use crate::store::{Dashboard, DashboardBuilder};

    // Live feed
    pub use crate::feed::{FeedConfig, FeedEvent, FeedState, LiveFeed};
}
