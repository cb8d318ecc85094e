//! Shared utilities and common types for the Campus Events client.
//!
//! This crate provides common functionality used across all other crates:
//! - Page/limit pagination math and client-side slicing
//! - Common validation logic for event forms
//! - Lenient timestamp (de)serialization for backend payloads
//! - Text helpers for list rendering

pub mod pagination;
pub mod text;
pub mod time;
pub mod validation;
