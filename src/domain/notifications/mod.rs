//! Notifications domain — the append-only alert log.

pub mod state;

use crate::shared::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One alert event in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// What a producer supplies; id, timestamp and read flag are assigned on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl NewNotification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}
