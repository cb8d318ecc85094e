//! Dashboard models for `GET /my-events`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::time::timestamp;

use super::event::{EventId, Scheduled};

/// An event the caller organizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatedEvent {
    pub id: EventId,
    pub title: String,
    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,
    pub venue: String,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
    pub category: String,
}

impl Scheduled for CreatedEvent {
    fn starts_at(&self) -> DateTime<Utc> {
        self.date_time
    }
}

/// An event the caller registered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegisteredEvent {
    pub id: EventId,
    pub title: String,
    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,
    pub venue: String,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    pub category: String,
    #[serde(with = "timestamp")]
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub attended: bool,
}

impl Scheduled for RegisteredEvent {
    fn starts_at(&self) -> DateTime<Utc> {
        self.date_time
    }
}

/// Response for `GET /my-events`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MyEventsResponse {
    #[serde(default)]
    pub created_events: Vec<CreatedEvent>,
    #[serde(default)]
    pub registered_events: Vec<RegisteredEvent>,
}

impl MyEventsResponse {
    /// Whether the caller holds a registration for `event_id`.
    pub fn is_registered_for(&self, event_id: EventId) -> bool {
        self.registered_events.iter().any(|e| e.id == event_id)
    }
}
