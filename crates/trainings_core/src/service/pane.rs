//! Master-detail pane coordination.
//!
//! # Responsibility
//! - Fix the layout regime once from device orientation.
//! - Track list/detail visibility and the detail back stack.
//! - Decide whether a back request is consumed or falls through to the host.
//!
//! # Invariants
//! - The regime never changes for the lifetime of a coordinator.
//! - Dual-pane state is always `BothVisible` and never grows the back stack.
//! - Single-pane back stack is non-empty exactly when the detail is visible.

use crate::model::entry::Entry;
use crate::service::detail::DetailView;
use log::debug;

/// Device orientation reported by the host at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Layout regime chosen from orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneRegime {
    /// List and detail are mutually exclusive.
    SinglePane,
    /// List and detail are always shown together.
    DualPane,
}

impl From<Orientation> for PaneRegime {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Portrait => PaneRegime::SinglePane,
            Orientation::Landscape => PaneRegime::DualPane,
        }
    }
}

/// Which panes are currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneState {
    ListVisible,
    DetailVisible,
    BothVisible,
}

/// Result of a back-navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// The coordinator consumed the request and returned to the list.
    Handled,
    /// Not intercepted; the host should run its default back behavior.
    Default,
}

/// Render-ready pane state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSnapshot {
    pub regime: PaneRegime,
    pub list_visible: bool,
    pub detail_visible: bool,
    pub detail: Option<DetailView>,
    pub back_stack_depth: usize,
}

/// Owns pane visibility and detail navigation.
#[derive(Debug, Clone)]
pub struct PaneCoordinator {
    regime: PaneRegime,
    state: PaneState,
    detail: Option<DetailView>,
    back_stack: Vec<PaneState>,
}

impl PaneCoordinator {
    /// Creates a coordinator for `orientation`.
    ///
    /// In dual-pane the first entry is shown right away so the detail pane
    /// is never empty when the collection is not.
    pub fn new(orientation: Orientation, entries: &[Entry]) -> Self {
        let regime = PaneRegime::from(orientation);
        let mut coordinator = Self {
            regime,
            state: match regime {
                PaneRegime::SinglePane => PaneState::ListVisible,
                PaneRegime::DualPane => PaneState::BothVisible,
            },
            detail: None,
            back_stack: Vec::new(),
        };

        if regime == PaneRegime::DualPane {
            if let Some(first) = entries.first() {
                coordinator.select(first);
            }
        }
        coordinator
    }

    pub fn regime(&self) -> PaneRegime {
        self.regime
    }

    pub fn state(&self) -> PaneState {
        self.state
    }

    pub fn is_list_visible(&self) -> bool {
        matches!(self.state, PaneState::ListVisible | PaneState::BothVisible)
    }

    pub fn is_detail_visible(&self) -> bool {
        matches!(self.state, PaneState::DetailVisible | PaneState::BothVisible)
    }

    /// Detail currently rendered, if any.
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn back_stack_depth(&self) -> usize {
        self.back_stack.len()
    }

    /// Shows `entry` in the detail pane.
    pub fn select(&mut self, entry: &Entry) {
        self.detail = Some(DetailView::from_entry(entry));
        // Detail already visible (single) or permanent (dual): replace only.
        if self.regime == PaneRegime::SinglePane && self.state == PaneState::ListVisible {
            self.back_stack.push(self.state);
            self.state = PaneState::DetailVisible;
        }
        debug!(
            "event=pane_select module=pane regime={:?} state={:?} back_stack_depth={}",
            self.regime,
            self.state,
            self.back_stack.len()
        );
    }

    /// Handles a back-navigation request.
    pub fn back(&mut self) -> BackOutcome {
        let outcome = match (self.regime, self.state) {
            (PaneRegime::SinglePane, PaneState::DetailVisible) => {
                self.back_stack.pop();
                self.state = PaneState::ListVisible;
                self.detail = None;
                BackOutcome::Handled
            }
            _ => BackOutcome::Default,
        };
        debug!(
            "event=pane_back module=pane regime={:?} outcome={:?}",
            self.regime, outcome
        );
        outcome
    }

    pub fn snapshot(&self) -> PaneSnapshot {
        PaneSnapshot {
            regime: self.regime,
            list_visible: self.is_list_visible(),
            detail_visible: self.is_detail_visible(),
            detail: self.detail.clone(),
            back_stack_depth: self.back_stack.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackOutcome, Orientation, PaneCoordinator, PaneRegime, PaneState};
    use crate::model::entry::seed_entries;

    #[test]
    fn portrait_starts_on_list_without_detail() {
        let coordinator = PaneCoordinator::new(Orientation::Portrait, &seed_entries());
        assert_eq!(coordinator.regime(), PaneRegime::SinglePane);
        assert_eq!(coordinator.state(), PaneState::ListVisible);
        assert!(coordinator.detail().is_none());
    }

    #[test]
    fn landscape_with_no_entries_keeps_detail_empty() {
        let coordinator = PaneCoordinator::new(Orientation::Landscape, &[]);
        assert_eq!(coordinator.state(), PaneState::BothVisible);
        assert!(coordinator.detail().is_none());
    }

    #[test]
    fn back_on_list_falls_through() {
        let mut coordinator = PaneCoordinator::new(Orientation::Portrait, &seed_entries());
        assert_eq!(coordinator.back(), BackOutcome::Default);
        assert_eq!(coordinator.state(), PaneState::ListVisible);
    }

    #[test]
    fn reselect_while_detail_visible_does_not_grow_stack() {
        let seeds = seed_entries();
        let mut coordinator = PaneCoordinator::new(Orientation::Portrait, &seeds);
        coordinator.select(&seeds[0]);
        coordinator.select(&seeds[1]);
        assert_eq!(coordinator.back_stack_depth(), 1);
        assert_eq!(coordinator.detail().map(|d| d.name.as_str()), Some("Voleibol"));
        assert_eq!(coordinator.back(), BackOutcome::Handled);
        assert_eq!(coordinator.back_stack_depth(), 0);
    }
}
