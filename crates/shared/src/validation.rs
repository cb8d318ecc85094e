//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Minimum number of characters in a contact phone number.
const MIN_PHONE_LENGTH: usize = 7;

/// Maximum number of characters in a contact phone number (matches the backend column).
const MAX_PHONE_LENGTH: usize = 20;

lazy_static::lazy_static! {
    static ref CONTACT_PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9 ()\-]+$").unwrap();
}

/// Validates that an event ends strictly after it starts.
pub fn validate_event_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if ends_at > starts_at {
        Ok(())
    } else {
        let mut err = ValidationError::new("event_window");
        err.message = Some("End time must be after the start time".into());
        Err(err)
    }
}

/// Validates that a registration deadline does not fall after the event start.
pub fn validate_registration_deadline(
    deadline: DateTime<Utc>,
    starts_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if deadline <= starts_at {
        Ok(())
    } else {
        let mut err = ValidationError::new("registration_deadline");
        err.message = Some("Registration deadline cannot be after the event starts".into());
        Err(err)
    }
}

/// Validates a contact phone number.
/// - Digits, spaces, dashes and parentheses, with an optional leading `+`
/// - Between 7 and 20 characters
pub fn validate_contact_phone(phone: &str) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    if !(MIN_PHONE_LENGTH..=MAX_PHONE_LENGTH).contains(&len) {
        let mut err = ValidationError::new("contact_phone_length");
        err.message = Some("Contact phone must be between 7 and 20 characters".into());
        return Err(err);
    }

    if !CONTACT_PHONE_REGEX.is_match(phone) {
        let mut err = ValidationError::new("contact_phone_format");
        err.message = Some("Contact phone may only contain digits, spaces, +, - and ()".into());
        return Err(err);
    }

    Ok(())
}
