//! Core domain logic for the trainings app.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingError, LoggingStatus,
};
pub use model::entry::{
    decode_entries, encode_entries, ensure_unique_names, find_name_collision,
    names_equal_ignore_case, seed_entries, DuplicateNames, Entry, EntryCodecError, Icon,
};
pub use repo::record_store::{
    RecordStore, SqliteRecordStore, StoreError, StoreResult, DEFAULT_STORE_NAME, TRAININGS_KEY,
};
pub use service::add_entry::{validate_new_entry, AddEntryForm, ValidationError};
pub use service::detail::DetailView;
pub use service::pane::{
    BackOutcome, Orientation, PaneCoordinator, PaneRegime, PaneSnapshot, PaneState,
};
pub use service::session::{
    CorruptStatePolicy, EntrySource, RotationSnapshot, SessionConfig, SessionError,
    SessionResult, TrainingSession,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
