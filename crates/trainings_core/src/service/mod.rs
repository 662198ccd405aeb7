//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate form validation, pane navigation, and persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod add_entry;
pub mod detail;
pub mod pane;
pub mod session;
