//! The per-domain fetch lifecycle: pending → fulfilled | rejected.
//!
//! Every asynchronous fetch follows the same protocol. `begin` transitions
//! loading=true and clears the error; `finish` transitions loading=false and
//! advances `last_updated`; `fail` transitions loading=false and records a
//! human-readable error string, leaving data untouched.
//!
//! Overlapping fetches of the same domain are single-flight with supersede:
//! `begin` bumps an epoch, and a completion carrying a stale epoch is
//! discarded wholly. The caller checks the boolean before merging results.

use chrono::{DateTime, Utc};

/// Loading / error / freshness state for one domain store.
#[derive(Debug, Clone, Default)]
pub struct FetchLifecycle {
    loading: bool,
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
    epoch: u64,
}

impl FetchLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request. Returns the epoch the completion must present.
    pub fn begin(&mut self) -> u64 {
        self.epoch += 1;
        self.loading = true;
        self.error = None;
        self.epoch
    }

    /// Complete the request with the given epoch successfully.
    ///
    /// Returns `false` (and changes nothing) if a newer request has begun
    /// since — the stale completion loses observability entirely.
    pub fn finish(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            tracing::debug!(stale = epoch, current = self.epoch, "Discarding superseded fetch result");
            return false;
        }
        self.loading = false;
        let now = Utc::now();
        // last_updated only ever advances within a session.
        self.last_updated = Some(match self.last_updated {
            Some(prev) if prev > now => prev,
            _ => now,
        });
        true
    }

    /// Fail the request with the given epoch.
    ///
    /// Same supersede rule as `finish`. Prior data stays untouched either way.
    pub fn fail(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(stale = epoch, current = self.epoch, "Discarding superseded fetch failure");
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_sets_loading_and_clears_error() {
        let mut lc = FetchLifecycle::new();
        let e = lc.begin();
        lc.fail(e, "boom");
        assert_eq!(lc.error(), Some("boom"));
        assert!(!lc.is_loading());

        lc.begin();
        assert!(lc.is_loading());
        assert_eq!(lc.error(), None);
    }

    #[test]
    fn test_finish_sets_last_updated() {
        let mut lc = FetchLifecycle::new();
        assert_eq!(lc.last_updated(), None);
        let e = lc.begin();
        assert!(lc.finish(e));
        assert!(!lc.is_loading());
        assert!(lc.last_updated().is_some());
    }

    #[test]
    fn test_superseded_finish_is_discarded() {
        let mut lc = FetchLifecycle::new();
        let first = lc.begin();
        let second = lc.begin();
        assert!(!lc.finish(first));
        assert!(lc.is_loading(), "stale completion must not clear loading");
        assert!(lc.finish(second));
        assert!(!lc.is_loading());
    }

    #[test]
    fn test_superseded_fail_is_discarded() {
        let mut lc = FetchLifecycle::new();
        let first = lc.begin();
        let second = lc.begin();
        assert!(!lc.fail(first, "old failure"));
        assert_eq!(lc.error(), None);
        assert!(lc.fail(second, "new failure"));
        assert_eq!(lc.error(), Some("new failure"));
    }

    #[test]
    fn test_last_updated_is_monotone() {
        let mut lc = FetchLifecycle::new();
        let e = lc.begin();
        lc.finish(e);
        let first = lc.last_updated().unwrap();
        let e = lc.begin();
        lc.finish(e);
        assert!(lc.last_updated().unwrap() >= first);
    }
}
