//! Per-card registration state.
//!
//! Tracks whether the viewer is registered, which action (if any) is in
//! flight and the last error to display. Outcomes are applied only when the
//! server has confirmed them and only if the ticket that started the action
//! is still current, so a completion that arrives after the view was
//! invalidated (e.g. navigation away) is dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::Event;

/// A registration mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationAction {
    Register,
    Unregister,
}

impl RegistrationAction {
    /// Registration flag the server reports once this action succeeds.
    pub fn resulting_registration(&self) -> bool {
        matches!(self, RegistrationAction::Register)
    }
}

impl std::fmt::Display for RegistrationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationAction::Register => write!(f, "register"),
            RegistrationAction::Unregister => write!(f, "unregister"),
        }
    }
}

/// Reasons an action cannot start.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("A {0} request is already in progress")]
    Busy(RegistrationAction),

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("You are not registered for this event")]
    NotRegistered,

    #[error("Registration is closed for this event")]
    Closed,
}

/// Proof that an action was started, handed back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    action: RegistrationAction,
    generation: u64,
}

impl Ticket {
    pub fn action(&self) -> RegistrationAction {
        self.action
    }
}

/// Result of handing a completion back to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The state was invalidated after the ticket was issued; nothing changed.
    Stale,
}

/// Registration state of one event as seen by one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationState {
    is_registered: bool,
    in_flight: Option<RegistrationAction>,
    generation: u64,
    last_error: Option<String>,
}

impl RegistrationState {
    pub fn new(is_registered: bool) -> Self {
        Self {
            is_registered,
            ..Default::default()
        }
    }

    /// Seeds the state from the server's `is_registered` field (absent → not registered).
    pub fn from_event(event: &Event) -> Self {
        Self::new(event.is_registered.unwrap_or(false))
    }

    pub fn is_registered(&self) -> bool {
        self.is_registered
    }

    pub fn in_flight(&self) -> Option<RegistrationAction> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Starts `action`, refusing while another action is in flight or when the
    /// action contradicts the current registration flag.
    pub fn begin(&mut self, action: RegistrationAction) -> Result<Ticket, RegistrationError> {
        if let Some(current) = self.in_flight {
            return Err(RegistrationError::Busy(current));
        }

        match action {
            RegistrationAction::Register if self.is_registered => {
                return Err(RegistrationError::AlreadyRegistered)
            }
            RegistrationAction::Unregister if !self.is_registered => {
                return Err(RegistrationError::NotRegistered)
            }
            _ => {}
        }

        self.in_flight = Some(action);
        self.last_error = None;
        Ok(Ticket {
            action,
            generation: self.generation,
        })
    }

    /// Applies a completion: `Ok(flag)` is the server-confirmed registration
    /// flag, `Err(message)` leaves the flag untouched and records the message.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<bool, String>) -> Completion {
        if ticket.generation != self.generation {
            debug!(
                action = %ticket.action,
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "Ignoring stale registration completion"
            );
            return Completion::Stale;
        }

        self.in_flight = None;
        match outcome {
            Ok(registered) => {
                self.is_registered = registered;
                self.last_error = None;
            }
            Err(message) => self.last_error = Some(message),
        }
        Completion::Applied
    }

    /// Drops interest in any in-flight action; its completion will be stale.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
    }

    /// Adopts a freshly fetched server flag. Ignored while an action is in
    /// flight, since its completion will carry the newer answer.
    pub fn sync(&mut self, is_registered: bool) {
        if self.in_flight.is_none() {
            self.is_registered = is_registered;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_success() {
        let mut state = RegistrationState::new(false);
        let ticket = state.begin(RegistrationAction::Register).unwrap();
        assert!(state.is_busy());

        assert_eq!(state.complete(ticket, Ok(true)), Completion::Applied);
        assert!(state.is_registered());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_second_begin_while_in_flight_is_busy() {
        let mut state = RegistrationState::new(false);
        let _ticket = state.begin(RegistrationAction::Register).unwrap();
        assert_eq!(
            state.begin(RegistrationAction::Register),
            Err(RegistrationError::Busy(RegistrationAction::Register))
        );
    }

    #[test]
    fn test_inconsistent_actions_rejected() {
        let mut registered = RegistrationState::new(true);
        assert_eq!(
            registered.begin(RegistrationAction::Register),
            Err(RegistrationError::AlreadyRegistered)
        );

        let mut not_registered = RegistrationState::new(false);
        assert_eq!(
            not_registered.begin(RegistrationAction::Unregister),
            Err(RegistrationError::NotRegistered)
        );
    }

    #[test]
    fn test_error_keeps_flag_and_records_message() {
        let mut state = RegistrationState::new(false);
        let ticket = state.begin(RegistrationAction::Register).unwrap();
        state.complete(ticket, Err("This event is full!".to_string()));

        assert!(!state.is_registered());
        assert!(!state.is_busy());
        assert_eq!(state.last_error(), Some("This event is full!"));

        // Retrying clears the previous error
        let _ticket = state.begin(RegistrationAction::Register).unwrap();
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut state = RegistrationState::new(false);
        let ticket = state.begin(RegistrationAction::Register).unwrap();
        state.invalidate();

        assert_eq!(state.complete(ticket, Ok(true)), Completion::Stale);
        assert!(!state.is_registered());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_sync_ignored_while_in_flight() {
        let mut state = RegistrationState::new(false);
        state.sync(true);
        assert!(state.is_registered());

        let ticket = state.begin(RegistrationAction::Unregister).unwrap();
        state.sync(true);
        state.complete(ticket, Ok(false));
        state.sync(true);
        assert!(state.is_registered());
    }

    #[test]
    fn test_dismiss_error() {
        let mut state = RegistrationState::new(true);
        let ticket = state.begin(RegistrationAction::Unregister).unwrap();
        state.complete(ticket, Err("Resource not found!".to_string()));
        state.dismiss_error();
        assert_eq!(state.last_error(), None);
        assert!(state.is_registered());
    }

    #[test]
    fn test_resulting_registration() {
        assert!(RegistrationAction::Register.resulting_registration());
        assert!(!RegistrationAction::Unregister.resulting_registration());
        assert_eq!(RegistrationAction::Unregister.to_string(), "unregister");
    }
}
