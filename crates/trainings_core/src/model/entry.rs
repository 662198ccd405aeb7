//! Training entry domain model.
//!
//! # Responsibility
//! - Define `Entry` and the fixed `Icon` set.
//! - Provide the seed factory used on first launch.
//! - Encode/decode the persisted collection snapshot.
//!
//! # Invariants
//! - `Icon` wire values are stable integers `0..=3`; unknown values fail decoding.
//! - Seed names are pairwise distinct under case-insensitive comparison.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Icon asset shown next to a training.
///
/// Serialized as the integer `iconRef` so the stored shape stays flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Icon {
    /// Option A, preselected in the add form.
    #[default]
    Pilates,
    /// Option B.
    Voleibol,
    /// Option C.
    Fuerza,
    /// Option D.
    Running,
}

impl Icon {
    /// All selectable icons in picker order.
    pub const ALL: [Icon; 4] = [Icon::Pilates, Icon::Voleibol, Icon::Fuerza, Icon::Running];

    /// Stable wire value.
    pub fn code(self) -> u8 {
        match self {
            Icon::Pilates => 0,
            Icon::Voleibol => 1,
            Icon::Fuerza => 2,
            Icon::Running => 3,
        }
    }

    /// Parses a wire value.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Icon::Pilates),
            1 => Some(Icon::Voleibol),
            2 => Some(Icon::Fuerza),
            3 => Some(Icon::Running),
            _ => None,
        }
    }

    /// Asset label used by UI layers to resolve the drawable.
    pub fn asset_name(self) -> &'static str {
        match self {
            Icon::Pilates => "ic_pilates",
            Icon::Voleibol => "ic_voleibol",
            Icon::Fuerza => "ic_fuerza",
            Icon::Running => "ic_running",
        }
    }
}

impl From<Icon> for u8 {
    fn from(value: Icon) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Icon {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Icon::from_code(value).ok_or_else(|| format!("unknown iconRef `{value}`; expected 0..=3"))
    }
}

/// One training record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub description: String,
    /// Serialized as `iconRef` to match the stored snapshot shape.
    #[serde(rename = "iconRef")]
    pub icon: Icon,
}

impl Entry {
    pub fn new(name: impl Into<String>, description: impl Into<String>, icon: Icon) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            icon,
        }
    }
}

const SEEDS: [(&str, &str, Icon); 4] = [
    (
        "Pilates",
        "Ejercicio de bajo impacto que mejora la flexibilidad, fuerza muscular y postura corporal.",
        Icon::Pilates,
    ),
    (
        "Voleibol",
        "Deporte de equipo que mejora la coordinación, agilidad y trabajo en equipo.",
        Icon::Voleibol,
    ),
    (
        "Fuerza",
        "Entrenamiento con pesas y resistencia para aumentar la masa muscular y la potencia.",
        Icon::Fuerza,
    ),
    (
        "Running",
        "Carrera que mejora la resistencia cardiovascular, quema calorías y fortalece las piernas.",
        Icon::Running,
    ),
];

/// Returns the built-in entries used on first launch, in display order.
pub fn seed_entries() -> Vec<Entry> {
    SEEDS
        .iter()
        .map(|(name, description, icon)| Entry::new(*name, *description, *icon))
        .collect()
}

/// Finds an entry whose name matches `name` ignoring case.
///
/// `name` is compared as given; callers trim before calling.
pub fn find_name_collision<'a>(entries: &'a [Entry], name: &str) -> Option<&'a Entry> {
    entries
        .iter()
        .find(|entry| names_equal_ignore_case(&entry.name, name))
}

/// Compares two names one character at a time, ignoring case.
///
/// Characters match when equal, when their upper-case forms match, or when
/// the lower-case forms of those upper-case forms match. Final sigma and
/// dotted capital I compare equal to their plain counterparts.
pub fn names_equal_ignore_case(left: &str, right: &str) -> bool {
    let mut left = left.chars();
    let mut right = right.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if chars_equal_ignore_case(a, b) => {}
            _ => return false,
        }
    }
}

fn chars_equal_ignore_case(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    let (upper_a, upper_b) = (simple_upper(a), simple_upper(b));
    upper_a == upper_b || simple_lower(upper_a) == simple_lower(upper_b)
}

// Single-char mappings: a multi-char upper-case expansion (`ß` -> `SS`)
// leaves the char as is; `İ` lower-cases to `i` plus a combining dot, so
// the leading char is kept.
fn simple_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

fn simple_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Two entries in one collection share a name under case-insensitive comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNames {
    pub first: String,
    pub second: String,
}

impl Display for DuplicateNames {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "duplicate entry names `{}` and `{}`",
            self.first, self.second
        )
    }
}

impl Error for DuplicateNames {}

/// Checks that no two entries share a name ignoring case.
pub fn ensure_unique_names(entries: &[Entry]) -> Result<(), DuplicateNames> {
    for (index, entry) in entries.iter().enumerate() {
        if let Some(other) = find_name_collision(&entries[index + 1..], &entry.name) {
            return Err(DuplicateNames {
                first: entry.name.clone(),
                second: other.name.clone(),
            });
        }
    }
    Ok(())
}

/// Codec failure for persisted entry snapshots.
#[derive(Debug)]
pub struct EntryCodecError(serde_json::Error);

impl Display for EntryCodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid entry snapshot: {}", self.0)
    }
}

impl Error for EntryCodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Encodes the full collection as a JSON array.
pub fn encode_entries(entries: &[Entry]) -> Result<String, EntryCodecError> {
    serde_json::to_string(entries).map_err(EntryCodecError)
}

/// Decodes a JSON array produced by [`encode_entries`].
pub fn decode_entries(text: &str) -> Result<Vec<Entry>, EntryCodecError> {
    serde_json::from_str(text).map_err(EntryCodecError)
}

#[cfg(test)]
mod tests {
    use super::{
        ensure_unique_names, find_name_collision, names_equal_ignore_case, seed_entries, Entry,
        Icon,
    };

    #[test]
    fn seed_names_are_unique() {
        assert!(ensure_unique_names(&seed_entries()).is_ok());
    }

    #[test]
    fn collision_lookup_ignores_case_and_returns_original_name() {
        let seeds = seed_entries();
        let hit = find_name_collision(&seeds, "rUnNiNg").expect("running should collide");
        assert_eq!(hit.name, "Running");
        assert!(find_name_collision(&seeds, "Yoga").is_none());
    }

    #[test]
    fn ensure_unique_names_reports_first_pair() {
        let entries = vec![
            Entry::new("Yoga", "a", Icon::Pilates),
            Entry::new("Boxeo", "b", Icon::Fuerza),
            Entry::new("YOGA", "c", Icon::Running),
        ];
        let err = ensure_unique_names(&entries).unwrap_err();
        assert_eq!(err.first, "Yoga");
        assert_eq!(err.second, "YOGA");
    }

    #[test]
    fn name_comparison_is_per_character() {
        assert!(names_equal_ignore_case("ΟΔΟΣ", "οδοσ"));
        assert!(names_equal_ignore_case("οδος", "ΟΔΟΣ"));
        assert!(names_equal_ignore_case("İstanbul", "istanbul"));
        assert!(names_equal_ignore_case("FUERZA", "fuerza"));
        assert!(!names_equal_ignore_case("straße", "STRASSE"));
        assert!(!names_equal_ignore_case("Run", "Running"));
        assert!(!names_equal_ignore_case("", "a"));
    }

    #[test]
    fn icon_codes_are_stable() {
        let codes: Vec<u8> = Icon::ALL.iter().map(|icon| icon.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
        assert_eq!(Icon::from_code(4), None);
        assert_eq!(Icon::default(), Icon::Pilates);
    }
}
