//! Detail view projection.

use crate::model::entry::{Entry, Icon};

/// Render-ready fields for the detail pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub description: String,
    pub icon: Icon,
}

impl DetailView {
    /// Projects one entry. No validation; blank fields stay blank.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            description: entry.description.clone(),
            icon: entry.icon,
        }
    }
}

impl From<&Entry> for DetailView {
    fn from(value: &Entry) -> Self {
        Self::from_entry(value)
    }
}
