//! Domain layer for the Campus Events client.
//!
//! This crate contains:
//! - Domain models (Event, Notification, User) as exchanged with the events API
//! - The event status engine and client-side filtering
//! - The per-card registration state machine

pub mod models;
pub mod services;
