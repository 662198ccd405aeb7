//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `trainings_core` linkage and drive one session end to end.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `trainings_cli [--landscape] [STORE_PATH]`. Without a path the
//! session runs against an in-memory store.

use std::process::ExitCode;
use trainings_core::{
    BackOutcome, Orientation, SessionConfig, SqliteRecordStore, TrainingSession,
    DEFAULT_STORE_NAME,
};

fn main() -> ExitCode {
    println!("trainings_core ping={}", trainings_core::ping());
    println!("trainings_core version={}", trainings_core::core_version());

    let mut orientation = Orientation::Portrait;
    let mut store_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--landscape" => orientation = Orientation::Landscape,
            other => store_path = Some(other.to_string()),
        }
    }

    match run(orientation, store_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(orientation: Orientation, store_path: Option<&str>) -> Result<(), String> {
    let config = SessionConfig::default();
    let store = match store_path {
        Some(path) => SqliteRecordStore::open(path, DEFAULT_STORE_NAME),
        None => SqliteRecordStore::open_in_memory(DEFAULT_STORE_NAME),
    }
    .map_err(|err| err.to_string())?;

    let mut session = TrainingSession::start(store, None, orientation, &config)
        .map_err(|err| err.to_string())?;
    println!(
        "source={:?} regime={:?} entries={}",
        session.source(),
        session.pane().regime(),
        session.entries().len()
    );
    for (index, entry) in session.entries().iter().enumerate() {
        println!("  [{index}] {} ({})", entry.name, entry.icon.asset_name());
    }

    if let Some(last) = session.entries().len().checked_sub(1) {
        session.select(last).map_err(|err| err.to_string())?;
        let pane = session.pane_snapshot();
        println!(
            "select={last} list_visible={} detail_visible={} detail={}",
            pane.list_visible,
            pane.detail_visible,
            pane.detail.map(|detail| detail.name).unwrap_or_default()
        );
    }

    let back = session.back();
    println!(
        "back handled={} list_visible={}",
        back == BackOutcome::Handled,
        session.pane().is_list_visible()
    );

    session.on_pause();
    drop(session.shutdown());
    Ok(())
}
