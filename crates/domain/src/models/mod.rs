//! Domain models for Campus Events.

pub mod catalog;
pub mod event;
pub mod my_events;
pub mod notification;
pub mod user;

use serde::{Deserialize, Serialize};

pub use event::{Event, EventId, EventSummary, Scheduled, UserId};
pub use my_events::{CreatedEvent, MyEventsResponse, RegisteredEvent};
pub use notification::{Notification, NotificationType};
pub use user::User;

/// Plain acknowledgement body (`{"message": "..."}`) returned by mutations
/// and by every error response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
