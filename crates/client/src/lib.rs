//! HTTP client for the Campus Events API.
//!
//! - [`api::ApiClient`] wraps every endpoint the events frontend uses
//! - [`session::Session`] is passed explicitly to authenticated calls
//! - [`actions::RegistrationController`] runs register/unregister with an
//!   in-flight guard and re-fetches the event afterwards

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
