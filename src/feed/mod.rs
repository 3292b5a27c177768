//! Simulated live-update feed.
//!
//! Stands in for a push channel to a market-data/weather backend. A single
//! background tokio task owns every timer: the connect delay, the per-session
//! price perturbation ticks, the weather-alert ticks, the session deadline,
//! and the reconnect delay. Because all scheduled work lives inside that one
//! task, `LiveFeed::stop()` joining the task is the whole cancellation story —
//! nothing can fire afterwards.
//!
//! State machine:
//!
//! ```text
//! Disconnected --start()--> Connecting --delay--> Connected
//!      ^                                             |
//!      |<------ reconnect delay <---- session elapsed┘
//! ```
//!
//! `stop()` from any state transitions to Disconnected.

pub mod simulator;

pub use simulator::LiveFeed;

use std::time::Duration;

/// Timings and probabilities of the simulation.
///
/// Defaults are the reference behavior: 1 s connect delay, one price update
/// per asset per minute, a weather-alert roll every 5 minutes with 30 %
/// probability, 1 h sessions, 5 s reconnect delay.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub connect_delay: Duration,
    pub price_interval: Duration,
    pub alert_interval: Duration,
    pub session_duration: Duration,
    pub reconnect_delay: Duration,
    /// Chance of a weather alert per alert tick, in [0, 1].
    pub alert_probability: f64,
    /// Relative price change above which a notification is appended.
    pub alert_threshold: f64,
    /// Price draws are uniform in `[-max_price_change, +max_price_change]`.
    pub max_price_change: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            connect_delay: Duration::from_secs(1),
            price_interval: Duration::from_secs(60),
            alert_interval: Duration::from_secs(300),
            session_duration: Duration::from_secs(3600),
            reconnect_delay: Duration::from_secs(5),
            alert_probability: 0.3,
            alert_threshold: 0.007,
            max_price_change: 0.01,
        }
    }
}

/// Connection state of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FeedState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl From<u8> for FeedState {
    fn from(v: u8) -> Self {
        match v {
            1 => FeedState::Connecting,
            2 => FeedState::Connected,
            _ => FeedState::Disconnected,
        }
    }
}

/// Lifecycle events emitted to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The simulated connection is established; timers are running.
    Connected,
    /// The session ended or the feed was stopped.
    Disconnected { reason: String },
}
