//! Domain services for Campus Events.
//!
//! Services contain the logic that operates on domain models. All of it is
//! pure: callers pass the current instant in.

pub mod event_filter;
pub mod event_status;
pub mod registration;

pub use event_filter::{split_by_time, DashboardStats, EventFilter};
pub use event_status::{
    can_register, event_status, is_event_active, is_full, is_registration_open,
    registration_control, seats_remaining, EventStatus, RegistrationButton, RegistrationControl,
};
pub use registration::{
    Completion, RegistrationAction, RegistrationError, RegistrationState, Ticket,
};
