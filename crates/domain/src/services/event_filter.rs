//! Client-side filtering of already-fetched event lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::catalog::selected_option;
use crate::models::{Event, Scheduled};

/// Filter state of the events page.
///
/// Category and department treat blank values and `"all"` as unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub upcoming_only: bool,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            department: None,
            upcoming_only: true,
        }
    }
}

impl EventFilter {
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn category(&self) -> Option<&str> {
        selected_option(self.category.as_deref())
    }

    pub fn department(&self) -> Option<&str> {
        selected_option(self.department.as_deref())
    }

    /// Whether `event` passes every active constraint at `now`.
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        if let Some(category) = self.category() {
            if event.category != category {
                return false;
            }
        }

        if let Some(department) = self.department() {
            if event.department != department {
                return false;
            }
        }

        // Same cut-off as the server's `upcoming` listing filter
        if self.upcoming_only && event.date_time < now {
            return false;
        }

        match self.search_term() {
            None => true,
            Some(term) => [&event.title, &event.description, &event.venue]
                .iter()
                .any(|field| field.to_lowercase().contains(&term)),
        }
    }

    /// Matching events, in their original order.
    pub fn apply<'a>(&self, events: &'a [Event], now: DateTime<Utc>) -> Vec<&'a Event> {
        events.iter().filter(|e| self.matches(e, now)).collect()
    }

    /// Query parameters for `GET /events`, omitting unconstrained values.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category() {
            pairs.push(("category", category.to_string()));
        }
        if let Some(department) = self.department() {
            pairs.push(("department", department.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if self.upcoming_only {
            pairs.push(("upcoming", "true".to_string()));
        }
        pairs
    }
}

/// Splits into (upcoming, past): upcoming iff the start is strictly after `now`.
pub fn split_by_time<T: Scheduled>(events: &[T], now: DateTime<Utc>) -> (Vec<&T>, Vec<&T>) {
    events.iter().partition(|e| e.starts_at() > now)
}

/// Headline counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_events: usize,
    pub active_events: usize,
    pub total_registrations: u64,
}

impl DashboardStats {
    pub fn compute(events: &[Event], now: DateTime<Utc>) -> Self {
        Self {
            total_events: events.len(),
            active_events: events
                .iter()
                .filter(|e| e.is_active && e.date_time > now)
                .count(),
            total_registrations: events.iter().map(|e| e.current_participants as u64).sum(),
        }
    }
}
