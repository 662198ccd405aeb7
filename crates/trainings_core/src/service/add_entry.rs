//! Add-entry form use-case.
//!
//! # Responsibility
//! - Hold transient form state (name, description, picked icon).
//! - Validate input against the current collection and produce a new `Entry`.
//!
//! # Invariants
//! - Validation order is name, description, duplicate; first failure wins.
//! - A failed submit leaves form fields untouched for correction.
//! - The form never mutates the collection; the caller appends the result.

use crate::model::entry::{find_name_collision, Entry, Icon};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reason for one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is blank after trim.
    EmptyName,
    /// Description is blank after trim.
    EmptyDescription,
    /// Name collides with an existing entry ignoring case.
    DuplicateName {
        /// Colliding entry name in its original casing.
        existing: String,
    },
}

impl ValidationError {
    /// Message shown to the user by the UI layer.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyName => "Por favor ingresa un nombre".to_string(),
            Self::EmptyDescription => "Por favor ingresa una descripción".to_string(),
            Self::DuplicateName { existing } => {
                format!("Ya existe un entrenamiento con ese nombre: {existing}")
            }
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be blank"),
            Self::EmptyDescription => write!(f, "description must not be blank"),
            Self::DuplicateName { existing } => {
                write!(f, "an entry named `{existing}` already exists")
            }
        }
    }
}

impl Error for ValidationError {}

/// Validates raw form input and builds the entry it describes.
///
/// Stored name and description are trimmed.
pub fn validate_new_entry(
    name: &str,
    description: &str,
    icon: Icon,
    existing: &[Entry],
) -> Result<Entry, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let description = description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    if let Some(collision) = find_name_collision(existing, name) {
        return Err(ValidationError::DuplicateName {
            existing: collision.name.clone(),
        });
    }

    Ok(Entry::new(name, description, icon))
}

/// Transient add-entry form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddEntryForm {
    name: String,
    description: String,
    icon: Icon,
}

impl AddEntryForm {
    /// Creates an empty form with the first icon preselected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Picks one of the fixed icons. No validation applies.
    pub fn select_icon(&mut self, icon: Icon) {
        self.icon = icon;
    }

    /// Validates current fields against `existing`.
    ///
    /// # Contract
    /// - Success returns the new entry; appending it is the caller's job.
    /// - Failure keeps every field as typed.
    pub fn submit(&self, existing: &[Entry]) -> Result<Entry, ValidationError> {
        validate_new_entry(&self.name, &self.description, self.icon, existing)
    }
}
