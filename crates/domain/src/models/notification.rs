//! In-app notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::time::timestamp;

use super::event::EventId;

/// Default number of notifications fetched per request.
pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 20;

/// Notification severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Success,
    Warning,
    Error,
    #[default]
    #[serde(other)]
    Info,
}

impl NotificationType {
    /// Icon name used when rendering the notification.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Success => "check-circle",
            NotificationType::Warning => "exclamation-triangle",
            NotificationType::Error => "times-circle",
            NotificationType::Info => "info-circle",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Info => write!(f, "info"),
            NotificationType::Success => write!(f, "success"),
            NotificationType::Warning => write!(f, "warning"),
            NotificationType::Error => write!(f, "error"),
        }
    }
}

/// A notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub event_id: Option<EventId>,
}

/// Response for `GET /notifications`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: u64,
}

/// Query for listing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationQuery {
    pub unread_only: bool,
    pub limit: u32,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            unread_only: false,
            limit: DEFAULT_NOTIFICATION_LIMIT,
        }
    }
}
