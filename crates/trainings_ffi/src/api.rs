//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the trainings session to Dart via FRB as sync calls.
//! - Hold one process-wide session between calls.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported through response envelopes, never thrown.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use trainings_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BackOutcome, DetailView, Entry, Icon, Orientation, PaneSnapshot, RotationSnapshot,
    SessionConfig, SessionError, SqliteRecordStore, TrainingSession, DEFAULT_STORE_NAME,
};

const STORE_DB_FILE_NAME: &str = "trainings_store.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<TrainingSession<SqliteRecordStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One list row or detail pane payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub name: String,
    pub description: String,
    /// Stable icon wire value (`0..=3`).
    pub icon_ref: u8,
    /// Drawable name for the icon.
    pub icon_asset: String,
}

/// Pane visibility envelope for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneResponse {
    pub ok: bool,
    pub dual_pane: bool,
    pub list_visible: bool,
    pub detail_visible: bool,
    pub detail: Option<EntryItem>,
    pub message: String,
}

impl PaneResponse {
    fn from_snapshot(snapshot: PaneSnapshot) -> Self {
        Self {
            ok: true,
            dual_pane: snapshot.regime == trainings_core::PaneRegime::DualPane,
            list_visible: snapshot.list_visible,
            detail_visible: snapshot.detail_visible,
            detail: snapshot.detail.as_ref().map(detail_item),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            dual_pane: false,
            list_visible: false,
            detail_visible: false,
            detail: None,
            message: message.into(),
        }
    }
}

/// Result of a back press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackResponse {
    /// `false` means the host should run its default back behavior.
    pub handled: bool,
    pub pane: PaneResponse,
}

/// Result of an add-entry submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddEntryResponse {
    pub ok: bool,
    pub entry: Option<EntryItem>,
    /// User-facing message; set on validation failure.
    pub message: String,
}

/// Starts (or restarts) the session.
///
/// `rotation_snapshot` is the text from [`session_save_instance_state`] when
/// the host is recreating the screen after a configuration change.
#[flutter_rust_bridge::frb(sync)]
pub fn session_start(landscape: bool, rotation_snapshot: Option<String>) -> PaneResponse {
    let rotation = match rotation_snapshot.as_deref().map(RotationSnapshot::decode) {
        Some(Ok(snapshot)) => Some(snapshot),
        Some(Err(err)) => {
            warn!("event=session_start module=ffi status=warn error_code=bad_rotation_snapshot error={err}");
            None
        }
        None => None,
    };
    let orientation = if landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };

    let mut guard = match lock_session() {
        Ok(guard) => guard,
        Err(message) => return PaneResponse::failure(message),
    };
    // Restart: the running session gets its final flush before the store reopens.
    if let Some(previous) = guard.take() {
        drop(previous.shutdown());
    }

    let store = match SqliteRecordStore::open(resolve_store_db_path(), DEFAULT_STORE_NAME) {
        Ok(store) => store,
        Err(err) => return PaneResponse::failure(format!("session_start failed: {err}")),
    };
    match TrainingSession::start(store, rotation, orientation, &SessionConfig::default()) {
        Ok(session) => {
            let response = PaneResponse::from_snapshot(session.pane_snapshot());
            *guard = Some(session);
            response
        }
        Err(err) => PaneResponse::failure(format!("session_start failed: {err}")),
    }
}

/// One option in the add form's icon picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconChoice {
    pub icon_ref: u8,
    pub icon_asset: String,
    /// Preselected when the form opens.
    pub is_default: bool,
}

/// Icon picker options in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn icon_choices() -> Vec<IconChoice> {
    Icon::ALL
        .iter()
        .map(|icon| IconChoice {
            icon_ref: icon.code(),
            icon_asset: icon.asset_name().to_string(),
            is_default: *icon == Icon::default(),
        })
        .collect()
}

/// Lists entries in display order. Empty when no session is running.
#[flutter_rust_bridge::frb(sync)]
pub fn session_entries() -> Vec<EntryItem> {
    with_session(|session| Ok(session.entries().iter().map(entry_item).collect()))
        .unwrap_or_default()
}

/// Shows the entry at `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn session_select(index: u32) -> PaneResponse {
    match with_session(|session| {
        session
            .select(index as usize)
            .map_err(|err| format!("session_select failed: {err}"))?;
        Ok(session.pane_snapshot())
    }) {
        Ok(snapshot) => PaneResponse::from_snapshot(snapshot),
        Err(message) => PaneResponse::failure(message),
    }
}

/// Handles a back press.
#[flutter_rust_bridge::frb(sync)]
pub fn session_back() -> BackResponse {
    match with_session(|session| {
        let outcome = session.back();
        Ok((outcome, session.pane_snapshot()))
    }) {
        Ok((outcome, snapshot)) => BackResponse {
            handled: outcome == BackOutcome::Handled,
            pane: PaneResponse::from_snapshot(snapshot),
        },
        Err(message) => BackResponse {
            handled: false,
            pane: PaneResponse::failure(message),
        },
    }
}

/// Validates and appends a new entry.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_add(name: String, description: String, icon_ref: u8) -> AddEntryResponse {
    let Some(icon) = Icon::from_code(icon_ref) else {
        return AddEntryResponse {
            ok: false,
            entry: None,
            message: format!("entry_add failed: unknown icon_ref {icon_ref}"),
        };
    };

    let result = with_session(|session| {
        let form = session.open_add_form();
        form.set_name(name);
        form.set_description(description);
        form.select_icon(icon);
        let submitted = session.submit_add_form();
        session.cancel_add_form();
        Ok(submitted)
    });

    match result {
        Ok(Ok(entry)) => AddEntryResponse {
            ok: true,
            entry: Some(entry_item(&entry)),
            message: "Entrenamiento añadido.".to_string(),
        },
        Ok(Err(SessionError::Validation(err))) => AddEntryResponse {
            ok: false,
            entry: None,
            message: err.user_message(),
        },
        Ok(Err(err)) => AddEntryResponse {
            ok: false,
            entry: None,
            message: format!("entry_add failed: {err}"),
        },
        Err(message) => AddEntryResponse {
            ok: false,
            entry: None,
            message,
        },
    }
}

/// Captures the collection before a configuration change.
///
/// Returns an empty string when no session is running.
#[flutter_rust_bridge::frb(sync)]
pub fn session_save_instance_state() -> String {
    with_session(|session| {
        session
            .save_instance_state()
            .encode()
            .map_err(|err| err.to_string())
    })
    .unwrap_or_default()
}

/// Flushes the collection when the host moves to the background.
#[flutter_rust_bridge::frb(sync)]
pub fn session_pause() {
    let _ = with_session(|session| {
        session.on_pause();
        Ok(())
    });
}

/// Clears stored trainings and restarts from the built-in ones.
#[flutter_rust_bridge::frb(sync)]
pub fn session_reset() -> PaneResponse {
    match with_session(|session| {
        session
            .reset()
            .map_err(|err| format!("session_reset failed: {err}"))?;
        Ok(session.pane_snapshot())
    }) {
        Ok(snapshot) => PaneResponse::from_snapshot(snapshot),
        Err(message) => PaneResponse::failure(message),
    }
}

/// Flushes and releases the session and its store.
#[flutter_rust_bridge::frb(sync)]
pub fn session_shutdown() {
    if let Ok(mut guard) = lock_session() {
        if let Some(session) = guard.take() {
            drop(session.shutdown());
        }
    }
}

fn lock_session() -> Result<MutexGuard<'static, Option<TrainingSession<SqliteRecordStore>>>, String>
{
    SESSION
        .lock()
        .map_err(|_| "session lock poisoned".to_string())
}

fn with_session<T>(
    f: impl FnOnce(&mut TrainingSession<SqliteRecordStore>) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = lock_session()?;
    let session = guard
        .as_mut()
        .ok_or_else(|| "session not started".to_string())?;
    f(session)
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TRAININGS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn entry_item(entry: &Entry) -> EntryItem {
    EntryItem {
        name: entry.name.clone(),
        description: entry.description.clone(),
        icon_ref: entry.icon.code(),
        icon_asset: entry.icon.asset_name().to_string(),
    }
}

fn detail_item(detail: &DetailView) -> EntryItem {
    EntryItem {
        name: detail.name.clone(),
        description: detail.description.clone(),
        icon_ref: detail.icon.code(),
        icon_asset: detail.icon.asset_name().to_string(),
    }
}
