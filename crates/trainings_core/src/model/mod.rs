//! Domain model for training entries.
//!
//! # Responsibility
//! - Define the canonical training record shared by list and detail views.
//! - Own the built-in seed table and the persisted JSON wire shape.
//!
//! # Invariants
//! - Entries are immutable once created; the collection only grows by append.
//! - Names are unique case-insensitively, enforced at insertion time.

pub mod entry;
