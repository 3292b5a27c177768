//! The feed's background task and the perturbation/alert logic.

use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::Stream;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::notifications::NewNotification;
use crate::feed::{FeedConfig, FeedEvent, FeedState};
use crate::shared::Severity;
use crate::store::Dashboard;

/// Fixed city list for synthetic weather alerts.
const ALERT_CITIES: [&str; 3] = ["London", "New York", "Tokyo"];

/// Fixed alert phrasings.
const ALERT_PHRASES: [&str; 5] = [
    "Heavy rain expected",
    "Temperature drop forecast",
    "Strong winds warning",
    "Heat wave alert",
    "Air quality warning",
];

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Stop,
}

// ─── Session exit reasons ────────────────────────────────────────────────────

enum SessionEnd {
    Elapsed,
    Stopped,
}

// ─── Public LiveFeed ─────────────────────────────────────────────────────────

/// The simulated live-update feed.
///
/// Writes crypto price updates and weather-alert notifications into the
/// `Dashboard` from a background tokio task; the public API communicates
/// with the task via an mpsc channel.
pub struct LiveFeed {
    config: FeedConfig,
    dashboard: Dashboard,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_tx: mpsc::Sender<FeedEvent>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<FeedEvent>>,
    task_handle: Option<JoinHandle<()>>,
    state: Arc<AtomicU8>,
}

impl LiveFeed {
    /// Create a feed over the given dashboard. Does not start yet.
    pub fn new(dashboard: Dashboard, config: FeedConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(64);
        Self {
            config,
            dashboard,
            cmd_tx: None,
            event_tx,
            event_rx: tokio::sync::Mutex::new(event_rx),
            task_handle: None,
            state: Arc::new(AtomicU8::new(FeedState::Disconnected as u8)),
        }
    }

    /// Start the feed. Spawns the background task that owns every timer.
    /// Idempotent while running.
    pub fn start(&mut self) {
        if self.cmd_tx.is_some() {
            return;
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        self.cmd_tx = Some(cmd_tx);

        let task = TaskState {
            config: self.config.clone(),
            dashboard: self.dashboard.clone(),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            state: Arc::clone(&self.state),
        };
        self.task_handle = Some(tokio::spawn(run_task(task)));
    }

    /// Stop the feed and join the background task.
    ///
    /// When this returns, every perturbation, alert, session and reconnect
    /// timer is gone: no further map mutation or notification append can
    /// happen.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Stop).await;
        }

        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }

        self.state.store(FeedState::Disconnected as u8, Ordering::SeqCst);
    }

    /// Current connection state.
    pub fn state(&self) -> FeedState {
        FeedState::from(self.state.load(Ordering::SeqCst))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == FeedState::Connected
    }

    /// Stream of lifecycle events.
    ///
    /// The returned stream borrows `self`, so it must be dropped before
    /// calling `stop()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = FeedEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(&self.event_rx, |rx| async move {
            let mut guard = rx.lock().await;
            guard.recv().await.map(|event| (event, rx))
        }))
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

struct TaskState {
    config: FeedConfig,
    dashboard: Dashboard,
    event_tx: mpsc::Sender<FeedEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    state: Arc<AtomicU8>,
}

impl TaskState {
    fn emit(&self, event: FeedEvent) {
        let _ = self.event_tx.try_send(event);
    }

    fn set_state(&self, state: FeedState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

async fn run_task(mut task: TaskState) {
    loop {
        // ── 1. Connect delay ─────────────────────────────────────────────
        task.set_state(FeedState::Connecting);
        tokio::select! {
            _ = tokio::time::sleep(task.config.connect_delay) => {}
            _ = task.cmd_rx.recv() => {
                // Stop, or the LiveFeed was dropped.
                task.set_state(FeedState::Disconnected);
                return;
            }
        }

        // ── 2. Connected session ─────────────────────────────────────────
        task.set_state(FeedState::Connected);
        task.emit(FeedEvent::Connected);
        tracing::info!("Live feed connected");

        let end = run_session(&mut task).await;

        task.set_state(FeedState::Disconnected);
        match end {
            SessionEnd::Stopped => {
                task.emit(FeedEvent::Disconnected {
                    reason: "Stopped".into(),
                });
                tracing::info!("Live feed stopped");
                return;
            }
            SessionEnd::Elapsed => {
                task.emit(FeedEvent::Disconnected {
                    reason: "Session elapsed".into(),
                });
                tracing::info!(
                    "Live feed session elapsed, reconnecting in {:?}",
                    task.config.reconnect_delay
                );
            }
        }

        // ── 3. Reconnect delay ───────────────────────────────────────────
        tokio::select! {
            _ = tokio::time::sleep(task.config.reconnect_delay) => {}
            _ = task.cmd_rx.recv() => {
                task.set_state(FeedState::Disconnected);
                return;
            }
        }
    }
}

/// One connected session — runs until the session duration elapses or a
/// stop command arrives.
async fn run_session(task: &mut TaskState) -> SessionEnd {
    let mut price_ticks = tokio::time::interval(task.config.price_interval);
    price_ticks.reset(); // skip immediate first tick

    let mut alert_ticks = tokio::time::interval(task.config.alert_interval);
    alert_ticks.reset();

    let session_deadline = tokio::time::sleep(task.config.session_duration);
    tokio::pin!(session_deadline);

    loop {
        tokio::select! {
            // ── a) Price perturbation tick ───────────────────────────────
            _ = price_ticks.tick() => {
                perturb_tracked_prices(&task.dashboard, &task.config).await;
            }

            // ── b) Weather alert tick ────────────────────────────────────
            _ = alert_ticks.tick() => {
                maybe_emit_weather_alert(&task.dashboard, task.config.alert_probability).await;
            }

            // ── c) Session deadline ──────────────────────────────────────
            () = &mut session_deadline => {
                return SessionEnd::Elapsed;
            }

            // ── d) Command from public API ───────────────────────────────
            cmd = task.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Stop) | None => return SessionEnd::Stopped,
                }
            }
        }
    }
}

// ─── Perturbation logic ──────────────────────────────────────────────────────

/// One tick: draw an independent change per tracked asset and apply it.
/// Assets without a snapshot are skipped.
async fn perturb_tracked_prices(dashboard: &Dashboard, config: &FeedConfig) {
    let ids = dashboard.crypto().await.tracked().to_vec();

    for id in ids {
        // Scoped so the rng is not held across an await point.
        let change = {
            let mut rng = rand::thread_rng();
            rng.gen_range(-config.max_price_change..=config.max_price_change)
        };

        let current = {
            let crypto = dashboard.crypto().await;
            crypto.get(&id).map(|s| (s.price, s.name.clone()))
        };
        let Some((price, name)) = current else {
            continue;
        };

        let new_price = perturbed_price(price, change);
        dashboard.apply_price_update(&id, new_price).await;
        tracing::debug!(asset = %id, price = new_price, change, "Applied price update");

        if let Some(alert) = price_alert(&name, change, config.alert_threshold) {
            dashboard.notify(alert).await;
        }
    }
}

/// `newPrice = currentPrice * (1 + change)`.
pub(crate) fn perturbed_price(current: f64, change: f64) -> f64 {
    current * (1.0 + change)
}

/// A notification when the relative change is large enough: success when the
/// price went up, warning when it went down.
pub(crate) fn price_alert(name: &str, change: f64, threshold: f64) -> Option<NewNotification> {
    if change.abs() <= threshold {
        return None;
    }
    let direction = if change > 0.0 { "increased" } else { "decreased" };
    let severity = if change > 0.0 {
        Severity::Success
    } else {
        Severity::Warning
    };
    Some(NewNotification::new(
        format!("{name} price alert"),
        format!(
            "{name} price has {direction} by {:.2}% in the last minute.",
            change.abs() * 100.0
        ),
        severity,
    ))
}

// ─── Weather alerts ──────────────────────────────────────────────────────────

async fn maybe_emit_weather_alert(dashboard: &Dashboard, probability: f64) {
    let (roll, city, phrase) = {
        let mut rng = rand::thread_rng();
        (
            rng.gen::<f64>(),
            *ALERT_CITIES.choose(&mut rng).expect("non-empty city list"),
            *ALERT_PHRASES.choose(&mut rng).expect("non-empty phrase list"),
        )
    };
    if roll < probability {
        dashboard.notify(weather_alert(city, phrase)).await;
        tracing::debug!(city, phrase, "Emitted weather alert");
    }
}

pub(crate) fn weather_alert(city: &str, phrase: &str) -> NewNotification {
    NewNotification::new(
        format!("Weather alert for {city}"),
        format!("{phrase} for the next 24 hours."),
        Severity::Warning,
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perturbed_price_applies_relative_change() {
        let price = perturbed_price(42568.23, 0.008);
        assert!((price - 42908.77584).abs() < 1e-6);
        // Rounded for display: 42908.78.
        assert_eq!((price * 100.0).round() / 100.0, 42908.78);
    }

    #[test]
    fn test_price_alert_above_threshold_positive() {
        let alert = price_alert("Bitcoin", 0.008, 0.007).expect("0.8% > 0.7%");
        assert_eq!(alert.severity, Severity::Success);
        assert_eq!(alert.title, "Bitcoin price alert");
        assert_eq!(
            alert.message,
            "Bitcoin price has increased by 0.80% in the last minute."
        );
    }

    #[test]
    fn test_price_alert_above_threshold_negative() {
        let alert = price_alert("Ethereum", -0.009, 0.007).unwrap();
        assert_eq!(alert.severity, Severity::Warning);
        assert!(alert.message.contains("decreased by 0.90%"));
    }

    #[test]
    fn test_price_alert_below_or_at_threshold_is_none() {
        assert!(price_alert("Bitcoin", 0.005, 0.007).is_none());
        assert!(price_alert("Bitcoin", -0.004, 0.007).is_none());
        // Strictly-greater contract: exactly the threshold does not alert.
        assert!(price_alert("Bitcoin", 0.007, 0.007).is_none());
    }

    #[test]
    fn test_weather_alert_format() {
        let alert = weather_alert("Tokyo", "Heat wave alert");
        assert_eq!(alert.title, "Weather alert for Tokyo");
        assert_eq!(alert.message, "Heat wave alert for the next 24 hours.");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_stop_when_never_started() {
        let dashboard = crate::store::Dashboard::builder().build();
        let mut feed = LiveFeed::new(dashboard, FeedConfig::default());
        assert_eq!(feed.state(), FeedState::Disconnected);
        feed.stop().await;
        assert_eq!(feed.state(), FeedState::Disconnected);
    }
}
