//! Notification log — newest-first, append-only except for removal.

use super::{NewNotification, Notification};
use chrono::Utc;
use std::collections::VecDeque;
use uuid::Uuid;

/// Ordered log of alert events. Front of the deque is the most recent entry;
/// that ordering is the read contract for consumers.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    items: VecDeque<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fresh id and current timestamp, insert at the front.
    /// Returns the id for callers that want to reference the entry.
    pub fn append(&mut self, entry: NewNotification) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push_front(Notification {
            id,
            title: entry.title,
            message: entry.message,
            severity: entry.severity,
            timestamp: Utc::now(),
            read: false,
        });
        id
    }

    /// Flip the read flag of one entry. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: Uuid) {
        if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in self.items.iter_mut() {
            n.read = true;
        }
    }

    /// Delete one entry. No ordering side effects beyond the removal.
    pub fn remove(&mut self, id: Uuid) {
        self.items.retain(|n| n.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn items(&self) -> &VecDeque<Notification> {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.front()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
