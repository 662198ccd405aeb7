//! Training session lifecycle and persistence bridge.
//!
//! # Responsibility
//! - Resolve the startup collection from rotation snapshot, store, or seeds.
//! - Own the collection and flush it to the record store after every append.
//! - Route selection, back navigation, and the add form to their services.
//!
//! # Invariants
//! - Startup priority is rotation snapshot > stored value > seeds.
//! - Seeds are persisted as soon as they are synthesized.
//! - Store writes never surface errors to callers; failures are logged.
//! - The collection only grows by append; entries are never edited in place.

use crate::model::entry::{
    decode_entries, encode_entries, ensure_unique_names, seed_entries, DuplicateNames, Entry,
    EntryCodecError,
};
use crate::repo::record_store::{RecordStore, StoreError};
use crate::service::add_entry::{AddEntryForm, ValidationError};
use crate::service::pane::{BackOutcome, Orientation, PaneCoordinator, PaneSnapshot};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What to do when the stored collection cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptStatePolicy {
    /// Log the failure, start from seeds, and overwrite the stored value.
    #[default]
    ResetToSeeds,
    /// Abort startup with `SessionError::CorruptState`.
    Fail,
}

/// Session configuration.
///
/// The store namespace is fixed by the `RecordStore` handed to
/// [`TrainingSession::start`], not configured here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub corrupt_state_policy: CorruptStatePolicy,
}

/// Where the startup collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    Rotation,
    Store,
    Seed,
    /// Seeds replaced an undecodable stored value.
    SeedAfterCorruption,
}

impl EntrySource {
    fn label(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::Store => "store",
            Self::Seed => "seed",
            Self::SeedAfterCorruption => "seed_after_corruption",
        }
    }
}

/// In-process state carried across a configuration-change restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSnapshot {
    pub entries: Vec<Entry>,
}

impl RotationSnapshot {
    /// Encodes the snapshot for hosts that park it as text.
    pub fn encode(&self) -> Result<String, EntryCodecError> {
        encode_entries(&self.entries)
    }

    pub fn decode(text: &str) -> Result<Self, EntryCodecError> {
        Ok(Self {
            entries: decode_entries(text)?,
        })
    }
}

/// Session-level failure.
#[derive(Debug)]
pub enum SessionError {
    /// Store could not be read at startup or cleared on reset.
    Store(StoreError),
    /// Stored value is undecodable and the policy is `Fail`.
    CorruptState(StoreError),
    /// Built-in seed table violates name uniqueness.
    InvalidSeeds(DuplicateNames),
    IndexOutOfRange { index: usize, len: usize },
    /// Submit was rejected by form validation; the form stays open.
    Validation(ValidationError),
    /// Submit or edit without an open add form.
    NoOpenForm,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::CorruptState(err) => write!(f, "{err}"),
            Self::InvalidSeeds(err) => write!(f, "invalid seed table: {err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "entry index {index} out of range for {len} entries")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoOpenForm => write!(f, "add form is not open"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) | Self::CorruptState(err) => Some(err),
            Self::InvalidSeeds(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::IndexOutOfRange { .. } | Self::NoOpenForm => None,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Top-level controller for one running screen session.
pub struct TrainingSession<S: RecordStore> {
    store: S,
    entries: Vec<Entry>,
    source: EntrySource,
    orientation: Orientation,
    pane: PaneCoordinator,
    add_form: Option<AddEntryForm>,
}

impl<S: RecordStore> TrainingSession<S> {
    /// Starts a session, resolving the collection by startup priority.
    ///
    /// # Errors
    /// - `InvalidSeeds` when the seed table has duplicate names.
    /// - `Store` when the store cannot be read.
    /// - `CorruptState` when the stored value is undecodable and the policy
    ///   is `CorruptStatePolicy::Fail`.
    pub fn start(
        store: S,
        rotation: Option<RotationSnapshot>,
        orientation: Orientation,
        config: &SessionConfig,
    ) -> SessionResult<Self> {
        ensure_unique_names(&seed_entries()).map_err(SessionError::InvalidSeeds)?;

        let (entries, source) = resolve_entries(&store, rotation, config)?;
        let pane = PaneCoordinator::new(orientation, &entries);
        let session = Self {
            store,
            entries,
            source,
            orientation,
            pane,
            add_form: None,
        };

        if matches!(
            source,
            EntrySource::Seed | EntrySource::SeedAfterCorruption
        ) {
            session.flush();
        }

        info!(
            "event=session_start module=session status=ok source={} entry_count={} regime={:?}",
            source.label(),
            session.entries.len(),
            session.pane.regime()
        );
        Ok(session)
    }

    /// Read-only view of the collection, in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn source(&self) -> EntrySource {
        self.source
    }

    pub fn pane(&self) -> &PaneCoordinator {
        &self.pane
    }

    pub fn pane_snapshot(&self) -> PaneSnapshot {
        self.pane.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends a validated entry and flushes the whole collection.
    ///
    /// Callers are expected to validate first (see `submit_add_form`).
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.flush();
        info!(
            "event=entry_added module=session status=ok entry_count={}",
            self.entries.len()
        );
    }

    /// Shows the entry at `index` in the detail pane.
    pub fn select(&mut self, index: usize) -> SessionResult<()> {
        let entry = self
            .entries
            .get(index)
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })?;
        self.pane.select(entry);
        Ok(())
    }

    /// Handles a back request; `Default` means the host should exit the screen.
    pub fn back(&mut self) -> BackOutcome {
        self.pane.back()
    }

    /// Opens a fresh add form, replacing any open one.
    pub fn open_add_form(&mut self) -> &mut AddEntryForm {
        self.add_form.insert(AddEntryForm::new())
    }

    pub fn add_form(&self) -> Option<&AddEntryForm> {
        self.add_form.as_ref()
    }

    pub fn add_form_mut(&mut self) -> Option<&mut AddEntryForm> {
        self.add_form.as_mut()
    }

    pub fn cancel_add_form(&mut self) {
        self.add_form = None;
    }

    /// Validates the open form against the collection.
    ///
    /// # Contract
    /// - Success appends the entry, persists, closes the form, and returns it.
    /// - Validation failure keeps the form open with its fields intact.
    pub fn submit_add_form(&mut self) -> SessionResult<Entry> {
        let form = self.add_form.as_ref().ok_or(SessionError::NoOpenForm)?;
        let entry = form.submit(&self.entries)?;
        self.add_form = None;
        self.add_entry(entry.clone());
        Ok(entry)
    }

    /// Captures the collection for a configuration-change restart.
    pub fn save_instance_state(&self) -> RotationSnapshot {
        RotationSnapshot {
            entries: self.entries.clone(),
        }
    }

    /// Redundant flush when the host loses foreground focus.
    pub fn on_pause(&self) {
        self.flush();
    }

    /// Clears stored data and restarts from seeds.
    pub fn reset(&mut self) -> SessionResult<()> {
        self.store.clear().map_err(SessionError::Store)?;
        self.entries = seed_entries();
        self.source = EntrySource::Seed;
        self.add_form = None;
        self.pane = PaneCoordinator::new(self.orientation, &self.entries);
        self.flush();
        info!("event=session_reset module=session status=ok");
        Ok(())
    }

    /// Flushes one last time and hands the store back for release.
    pub fn shutdown(self) -> S {
        self.flush();
        self.store
    }

    fn flush(&self) {
        match self.store.save(&self.entries) {
            Ok(()) => info!(
                "event=store_write module=session status=ok entry_count={}",
                self.entries.len()
            ),
            Err(err) => warn!(
                "event=store_write module=session status=error entry_count={} error={}",
                self.entries.len(),
                err
            ),
        }
    }
}

fn resolve_entries<S: RecordStore>(
    store: &S,
    rotation: Option<RotationSnapshot>,
    config: &SessionConfig,
) -> SessionResult<(Vec<Entry>, EntrySource)> {
    if let Some(snapshot) = rotation {
        return Ok((snapshot.entries, EntrySource::Rotation));
    }

    match store.load() {
        Ok(Some(entries)) => Ok((entries, EntrySource::Store)),
        Ok(None) => Ok((seed_entries(), EntrySource::Seed)),
        Err(err @ StoreError::CorruptState(_)) => match config.corrupt_state_policy {
            CorruptStatePolicy::ResetToSeeds => {
                error!(
                    "event=session_load module=session status=error error_code=corrupt_state action=reset_to_seeds error={}",
                    err
                );
                Ok((seed_entries(), EntrySource::SeedAfterCorruption))
            }
            CorruptStatePolicy::Fail => {
                error!(
                    "event=session_load module=session status=error error_code=corrupt_state action=fail error={}",
                    err
                );
                Err(SessionError::CorruptState(err))
            }
        },
        Err(err) => Err(SessionError::Store(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::{EntrySource, SessionError, TrainingSession};
    use crate::model::entry::Entry;
    use crate::repo::record_store::{RecordStore, StoreError, StoreResult};
    use crate::service::pane::Orientation;
    use std::cell::RefCell;

    /// Store whose writes always fail, to check writes stay fire-and-forget.
    #[derive(Default)]
    struct FailingStore {
        attempts: RefCell<usize>,
    }

    impl RecordStore for FailingStore {
        fn save(&self, _entries: &[Entry]) -> StoreResult<()> {
            *self.attempts.borrow_mut() += 1;
            Err(StoreError::Db(crate::db::DbError::Sqlite(
                rusqlite::Error::QueryReturnedNoRows,
            )))
        }

        fn load(&self) -> StoreResult<Option<Vec<Entry>>> {
            Ok(None)
        }

        fn clear(&self) -> StoreResult<()> {
            Ok(())
        }

        fn exists(&self) -> StoreResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn write_failures_are_swallowed() {
        let store = FailingStore::default();
        let mut session =
            TrainingSession::start(&store, None, Orientation::Portrait, &Default::default())
                .unwrap();
        assert_eq!(session.source(), EntrySource::Seed);

        session.add_entry(Entry::new("Yoga", "Estiramientos", Default::default()));
        session.on_pause();
        assert_eq!(session.entries().len(), 5);
        assert_eq!(*store.attempts.borrow(), 3);
    }

    #[test]
    fn select_out_of_range_is_rejected() {
        let store = FailingStore::default();
        let mut session =
            TrainingSession::start(&store, None, Orientation::Portrait, &Default::default())
                .unwrap();
        let err = session.select(9).unwrap_err();
        assert!(matches!(err, SessionError::IndexOutOfRange { index: 9, len: 4 }));
    }

    #[test]
    fn submit_without_form_is_rejected() {
        let store = FailingStore::default();
        let mut session =
            TrainingSession::start(&store, None, Orientation::Landscape, &Default::default())
                .unwrap();
        assert!(matches!(
            session.submit_add_form(),
            Err(SessionError::NoOpenForm)
        ));
    }
}
