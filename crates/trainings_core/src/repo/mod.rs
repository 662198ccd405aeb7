//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the durable key-value contract the session flushes into.
//! - Keep SQLite details inside the persistence boundary.
//!
//! # Invariants
//! - A stored value always decodes to a well-formed entry sequence, or the
//!   read reports `StoreError::CorruptState` instead of masking it.

pub mod record_store;
