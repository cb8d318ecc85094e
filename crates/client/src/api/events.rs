use reqwest::Method;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use domain::models::event::{
    CreateEventRequest, CreateEventResponse, EventDetailResponse, EventListResponse,
    FeaturedEventsResponse, UpdateEventRequest,
};
use domain::models::{Event, EventId, EventSummary, MessageResponse, MyEventsResponse, UserId};
use domain::services::{EventFilter, RegistrationAction};
use shared::pagination::PageRequest;

use super::{ApiClient, IDEMPOTENCY_KEY_HEADER};
use crate::error::ClientError;
use crate::session::Session;

/// Parameters for `GET /events`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub featured_only: bool,
    pub organizer: Option<UserId>,
    pub page: PageRequest,
}

impl EventQuery {
    pub fn new(filter: EventFilter, page: PageRequest) -> Self {
        Self {
            filter,
            page,
            ..Default::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filter.to_query_pairs();
        if self.featured_only {
            pairs.push(("featured", "true".to_string()));
        }
        if let Some(organizer) = self.organizer {
            pairs.push(("organizer", organizer.to_string()));
        }
        pairs.push(("page", self.page.page().to_string()));
        pairs.push(("limit", self.page.limit().to_string()));
        pairs
    }
}

#[derive(Serialize)]
struct Empty {}

impl ApiClient {
    /// One page of events. The session only matters for server-side
    /// personalisation; listing is public.
    pub async fn list_events(
        &self,
        session: Option<&Session>,
        query: &EventQuery,
    ) -> Result<EventListResponse, ClientError> {
        let request = self
            .request(Method::GET, "events", session)?
            .query(&query.to_query_pairs());
        self.send(request).await
    }

    /// A single event. With a session the response carries `is_registered`.
    pub async fn get_event(
        &self,
        session: Option<&Session>,
        event_id: EventId,
    ) -> Result<Event, ClientError> {
        let request = self.request(Method::GET, &format!("events/{}", event_id), session)?;
        let response: EventDetailResponse = self.send(request).await?;
        Ok(response.event)
    }

    pub async fn featured_events(&self) -> Result<Vec<EventSummary>, ClientError> {
        let request = self.request(Method::GET, "events/featured", None)?;
        let response: FeaturedEventsResponse = self.send(request).await?;
        Ok(response.events)
    }

    /// Sends a register or unregister call tagged with `idempotency_key`.
    pub async fn submit_registration(
        &self,
        session: &Session,
        event_id: EventId,
        action: RegistrationAction,
        idempotency_key: Uuid,
    ) -> Result<MessageResponse, ClientError> {
        let path = format!("events/{}/{}", event_id, action);
        let request = self
            .request(Method::POST, &path, Some(session))?
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(&Empty {});

        let response: MessageResponse = self.send(request).await?;
        info!(
            event_id,
            action = %action,
            idempotency_key = %idempotency_key,
            "Registration change accepted"
        );
        Ok(response)
    }

    pub async fn register(
        &self,
        session: &Session,
        event_id: EventId,
    ) -> Result<MessageResponse, ClientError> {
        self.submit_registration(session, event_id, RegistrationAction::Register, Uuid::new_v4())
            .await
    }

    pub async fn unregister(
        &self,
        session: &Session,
        event_id: EventId,
    ) -> Result<MessageResponse, ClientError> {
        self.submit_registration(
            session,
            event_id,
            RegistrationAction::Unregister,
            Uuid::new_v4(),
        )
        .await
    }

    /// Events the caller organizes and events they registered for.
    pub async fn my_events(&self, session: &Session) -> Result<MyEventsResponse, ClientError> {
        let request = self.request(Method::GET, "my-events", Some(session))?;
        self.send(request).await
    }

    /// Validates locally, then creates the event. Organizers and admins only.
    pub async fn create_event(
        &self,
        session: &Session,
        event: &CreateEventRequest,
    ) -> Result<CreateEventResponse, ClientError> {
        event.validate_all()?;

        let request = self
            .request(Method::POST, "events", Some(session))?
            .json(event);
        let response: CreateEventResponse = self.send(request).await?;
        info!(event_id = response.event.id, title = %response.event.title, "Event created");
        Ok(response)
    }

    pub async fn update_event(
        &self,
        session: &Session,
        event_id: EventId,
        changes: &UpdateEventRequest,
    ) -> Result<MessageResponse, ClientError> {
        if changes.is_empty() {
            return Err(ClientError::Validation("No changes to apply".to_string()));
        }
        changes.validate_all()?;

        let request = self
            .request(Method::PUT, &format!("events/{}", event_id), Some(session))?
            .json(changes);
        let response = self.send(request).await?;
        info!(event_id, "Event updated");
        Ok(response)
    }

    pub async fn delete_event(
        &self,
        session: &Session,
        event_id: EventId,
    ) -> Result<MessageResponse, ClientError> {
        let request = self.request(Method::DELETE, &format!("events/{}", event_id), Some(session))?;
        let response = self.send(request).await?;
        info!(event_id, "Event deleted");
        Ok(response)
    }
}
