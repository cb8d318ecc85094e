//! Event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use shared::pagination::Pagination;
use shared::time::{optional_timestamp, timestamp};
use validator::{Validate, ValidationErrors};

/// Identifier of an event on the events API.
pub type EventId = i64;

/// Identifier of a user on the events API.
pub type UserId = i64;

/// Anything with a start instant, used for upcoming/past splits.
pub trait Scheduled {
    fn starts_at(&self) -> DateTime<Utc>;
}

/// A full event record as returned by the listing and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub department: String,
    pub venue: String,
    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    /// `None` means registration never closes by deadline.
    #[serde(default, with = "optional_timestamp")]
    pub registration_deadline: Option<DateTime<Utc>>,
    /// `None` means unlimited capacity.
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_by: UserId,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    /// Organizer display name.
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub organizer_email: Option<String>,
    /// Only present on the detail endpoint for an authenticated caller.
    #[serde(default)]
    pub is_registered: Option<bool>,
    /// Server-side hint; the client derives its own answer from the deadline.
    #[serde(default)]
    pub can_register: Option<bool>,
}

// Listing payloads omit `is_active` because the backend only lists active events
fn default_active() -> bool {
    true
}

impl Event {
    /// Name shown as the organizer on cards: the organizer, else the department.
    pub fn organizer_label(&self) -> &str {
        self.organizer.as_deref().unwrap_or(&self.department)
    }

    /// Participant count as rendered on cards, e.g. `12 / 50` or `3 / ∞`.
    pub fn participants_label(&self) -> String {
        match self.max_participants {
            Some(max) => format!("{} / {}", self.current_participants, max),
            None => format!("{} / ∞", self.current_participants),
        }
    }
}

impl Scheduled for Event {
    fn starts_at(&self) -> DateTime<Utc> {
        self.date_time
    }
}

/// Abbreviated event as returned by the featured endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventSummary {
    pub id: EventId,
    pub title: String,
    /// Already truncated by the server.
    pub description: String,
    pub category: String,
    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,
    pub venue: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

impl Scheduled for EventSummary {
    fn starts_at(&self) -> DateTime<Utc> {
        self.date_time
    }
}

/// Response for `GET /events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub pagination: Pagination,
}

/// Response for `GET /events/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventDetailResponse {
    pub event: Event,
}

/// Response for `GET /events/featured`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeaturedEventsResponse {
    pub events: Vec<EventSummary>,
}

/// Request to create a new event.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    #[validate(length(min = 1, max = 100, message = "Department must be 1-100 characters"))]
    pub department: String,

    #[validate(length(min = 1, max = 200, message = "Venue must be 1-200 characters"))]
    pub venue: String,

    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none", with = "optional_timestamp")]
    pub registration_deadline: Option<DateTime<Utc>>,

    /// Capacity (1-100000). Omit for unlimited.
    #[validate(range(min = 1, max = 100000, message = "max_participants must be between 1 and 100000"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,

    #[validate(url(message = "Invalid image URL format"), length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    pub is_featured: bool,
}

impl CreateEventRequest {
    /// Runs field validation plus the cross-field schedule checks.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(err) = shared::validation::validate_event_window(self.date_time, self.end_time) {
            errors.add("end_time", err);
        }
        if let Some(deadline) = self.registration_deadline {
            if let Err(err) =
                shared::validation::validate_registration_deadline(deadline, self.date_time)
            {
                errors.add("registration_deadline", err);
            }
        }
        if let Some(phone) = &self.contact_phone {
            if let Err(err) = shared::validation::validate_contact_phone(phone) {
                errors.add("contact_phone", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial update of an event. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Department must be 1-100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Venue must be 1-200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", with = "optional_timestamp")]
    pub date_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", with = "optional_timestamp")]
    pub end_time: Option<DateTime<Utc>>,

    /// `Some(None)` clears the deadline; `None` leaves it unchanged.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_deadline_change"
    )]
    pub registration_deadline: Option<Option<DateTime<Utc>>>,

    #[validate(range(min = 1, max = 100000, message = "max_participants must be between 1 and 100000"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,

    #[validate(url(message = "Invalid image URL format"), length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

impl UpdateEventRequest {
    /// Runs field validation plus the schedule checks that can be made
    /// without the stored event.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let (Some(start), Some(end)) = (self.date_time, self.end_time) {
            if let Err(err) = shared::validation::validate_event_window(start, end) {
                errors.add("end_time", err);
            }
        }
        if let (Some(start), Some(Some(deadline))) = (self.date_time, self.registration_deadline) {
            if let Err(err) = shared::validation::validate_registration_deadline(deadline, start) {
                errors.add("registration_deadline", err);
            }
        }
        if let Some(phone) = &self.contact_phone {
            if let Err(err) = shared::validation::validate_contact_phone(phone) {
                errors.add("contact_phone", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// True when the request would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.department.is_none()
            && self.venue.is_none()
            && self.date_time.is_none()
            && self.end_time.is_none()
            && self.registration_deadline.is_none()
            && self.max_participants.is_none()
            && self.image_url.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && self.is_featured.is_none()
    }
}

fn serialize_deadline_change<S>(
    change: &Option<Option<DateTime<Utc>>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match change {
        Some(Some(ts)) => serializer.serialize_str(&shared::time::format_timestamp(ts)),
        _ => serializer.serialize_none(),
    }
}

/// Reference to a newly created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatedEventRef {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Response after creating an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventResponse {
    pub message: String,
    pub event: CreatedEventRef,
}
