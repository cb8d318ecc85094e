//! Event status engine.
//!
//! Pure functions deciding, for an event at a given instant, whether
//! registration is open, whether the event is still upcoming, which status
//! badge applies and what the registration control shows. Every function is
//! total and takes `now` explicitly; nothing here reads the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::registration::RegistrationAction;
use crate::models::{Event, User};

pub const LABEL_PROCESSING: &str = "Processing...";
pub const LABEL_REGISTER: &str = "Register for Event";
pub const LABEL_REGISTRATION_CLOSED: &str = "Registration Closed";
pub const LABEL_UNREGISTER: &str = "Unregister";

/// Display status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    RegistrationClosed,
    Completed,
}

impl EventStatus {
    /// Human-readable badge text.
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::RegistrationClosed => "Registration Closed",
            EventStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::RegistrationClosed => write!(f, "registration_closed"),
            EventStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Registration is open when no deadline is set or `now` is strictly before it.
pub fn is_registration_open(event: &Event, now: DateTime<Utc>) -> bool {
    match event.registration_deadline {
        None => true,
        Some(deadline) => now < deadline,
    }
}

/// An event is active (upcoming) while `now` is strictly before its start.
pub fn is_event_active(event: &Event, now: DateTime<Utc>) -> bool {
    now < event.date_time
}

/// Status with the start check taking precedence over the deadline check.
pub fn event_status(event: &Event, now: DateTime<Utc>) -> EventStatus {
    if now > event.date_time {
        EventStatus::Completed
    } else if !is_registration_open(event, now) {
        EventStatus::RegistrationClosed
    } else {
        EventStatus::Upcoming
    }
}

/// Whether the registration control should be enabled for a viewer who is
/// (or is not) already registered. The registered flag is owned by the caller.
pub fn can_register(event: &Event, is_registered: bool, now: DateTime<Utc>) -> bool {
    is_registration_open(event, now) && !is_registered
}

/// Seats left, or `None` for unlimited capacity. Saturates at zero because the
/// count may be stale relative to the server.
pub fn seats_remaining(event: &Event) -> Option<u32> {
    event
        .max_participants
        .map(|max| max.saturating_sub(event.current_participants))
}

/// Capacity is set and reached. Display only; the server decides admission.
pub fn is_full(event: &Event) -> bool {
    seats_remaining(event) == Some(0)
}

/// What the registration area of an event card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationControl {
    /// The viewer organizes the event: edit/delete instead of registration.
    OwnerActions,
    Button(RegistrationButton),
}

/// A register or unregister button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationButton {
    pub action: RegistrationAction,
    pub label: &'static str,
    pub enabled: bool,
    /// Anonymous viewers are sent to sign-up instead of registering directly.
    pub requires_login: bool,
}

/// Derives the registration control for `viewer` (`None` when anonymous).
pub fn registration_control(
    event: &Event,
    viewer: Option<&User>,
    is_registered: bool,
    in_flight: bool,
    now: DateTime<Utc>,
) -> RegistrationControl {
    if viewer.is_some_and(|user| user.id == event.created_by) {
        return RegistrationControl::OwnerActions;
    }

    if is_registered {
        return RegistrationControl::Button(RegistrationButton {
            action: RegistrationAction::Unregister,
            label: if in_flight {
                LABEL_PROCESSING
            } else {
                LABEL_UNREGISTER
            },
            enabled: !in_flight,
            requires_login: false,
        });
    }

    let registrable = can_register(event, is_registered, now);
    let label = if in_flight {
        LABEL_PROCESSING
    } else if registrable {
        LABEL_REGISTER
    } else {
        LABEL_REGISTRATION_CLOSED
    };

    RegistrationControl::Button(RegistrationButton {
        action: RegistrationAction::Register,
        label,
        enabled: !in_flight && registrable,
        requires_login: viewer.is_none(),
    })
}
