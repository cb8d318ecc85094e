//! Register/unregister over the network.
//!
//! The controller refuses a second mutation for an event while one is in
//! flight, tags every attempt with a fresh idempotency key and re-fetches
//! the event afterwards so the caller renders the server's participant count.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use domain::models::{Event, EventId, MessageResponse};
use domain::services::{
    is_registration_open, RegistrationAction, RegistrationError, RegistrationState,
};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::Session;

/// Network operations the controller needs.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn submit(
        &self,
        session: &Session,
        event_id: EventId,
        action: RegistrationAction,
        idempotency_key: Uuid,
    ) -> Result<MessageResponse, ClientError>;

    async fn fetch_event(&self, session: &Session, event_id: EventId)
        -> Result<Event, ClientError>;
}

#[async_trait]
impl RegistrationGateway for ApiClient {
    async fn submit(
        &self,
        session: &Session,
        event_id: EventId,
        action: RegistrationAction,
        idempotency_key: Uuid,
    ) -> Result<MessageResponse, ClientError> {
        self.submit_registration(session, event_id, action, idempotency_key)
            .await
    }

    async fn fetch_event(
        &self,
        session: &Session,
        event_id: EventId,
    ) -> Result<Event, ClientError> {
        self.get_event(Some(session), event_id).await
    }
}

/// A server-confirmed registration change.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub action: RegistrationAction,
    /// Registration flag after the change, as confirmed by the server.
    pub is_registered: bool,
    /// Server's confirmation message.
    pub message: String,
    /// The re-fetched event; `None` when the re-fetch failed and the caller's
    /// copy is stale.
    pub event: Option<Event>,
}

impl RegistrationOutcome {
    pub fn is_stale(&self) -> bool {
        self.event.is_none()
    }
}

/// Converts a controller result into what [`RegistrationState::complete`] takes.
pub fn completion_result(result: &Result<RegistrationOutcome, ClientError>) -> Result<bool, String> {
    match result {
        Ok(outcome) => Ok(outcome.is_registered),
        Err(err) => Err(err.user_message()),
    }
}

/// Runs registration changes with at most one in flight per event.
pub struct RegistrationController<G> {
    gateway: G,
    in_flight: Mutex<HashMap<EventId, RegistrationAction>>,
}

impl<G: RegistrationGateway> RegistrationController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The action currently in flight for `event_id`, if any.
    pub fn in_flight(&self, event_id: EventId) -> Option<RegistrationAction> {
        self.slots().get(&event_id).copied()
    }

    pub async fn register(
        &self,
        session: &Session,
        event: &Event,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, ClientError> {
        self.execute(session, event, RegistrationAction::Register, now)
            .await
    }

    pub async fn unregister(
        &self,
        session: &Session,
        event: &Event,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, ClientError> {
        self.execute(session, event, RegistrationAction::Unregister, now)
            .await
    }

    /// Submits `action` for `event` and re-fetches the event.
    ///
    /// Registering is refused locally once the deadline has passed. A
    /// duplicate request for the same event fails with
    /// [`RegistrationError::Busy`] without touching the network.
    pub async fn execute(
        &self,
        session: &Session,
        event: &Event,
        action: RegistrationAction,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, ClientError> {
        if action == RegistrationAction::Register && !is_registration_open(event, now) {
            return Err(RegistrationError::Closed.into());
        }

        let _guard = self.acquire(event.id, action)?;
        let idempotency_key = Uuid::new_v4();
        debug!(event_id = event.id, action = %action, %idempotency_key, "Submitting registration change");

        let response = self
            .gateway
            .submit(session, event.id, action, idempotency_key)
            .await?;

        let confirmed = action.resulting_registration();
        let refreshed = match self.gateway.fetch_event(session, event.id).await {
            Ok(fresh) => Some(fresh),
            Err(err) => {
                warn!(
                    event_id = event.id,
                    error = %err,
                    "Could not re-fetch event after registration change"
                );
                None
            }
        };

        let is_registered = refreshed
            .as_ref()
            .and_then(|e| e.is_registered)
            .unwrap_or(confirmed);

        Ok(RegistrationOutcome {
            action,
            is_registered,
            message: response.message,
            event: refreshed,
        })
    }

    /// Runs `action` on behalf of a card: begins it on `state`, executes it
    /// and hands the result back to `state`.
    pub async fn run(
        &self,
        state: &mut RegistrationState,
        session: &Session,
        event: &Event,
        action: RegistrationAction,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, ClientError> {
        let ticket = state.begin(action)?;
        let result = self.execute(session, event, action, now).await;
        state.complete(ticket, completion_result(&result));
        result
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<EventId, RegistrationAction>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(
        &self,
        event_id: EventId,
        action: RegistrationAction,
    ) -> Result<InFlightGuard<'_>, RegistrationError> {
        let mut slots = self.slots();
        if let Some(current) = slots.get(&event_id) {
            debug!(event_id, current = %current, requested = %action, "Registration change already in flight");
            return Err(RegistrationError::Busy(*current));
        }
        slots.insert(event_id, action);
        Ok(InFlightGuard {
            slots: &self.in_flight,
            event_id,
        })
    }
}

/// Frees the event's in-flight slot when the request finishes or is dropped.
struct InFlightGuard<'a> {
    slots: &'a Mutex<HashMap<EventId, RegistrationAction>>,
    event_id: EventId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.event_id);
    }
}
