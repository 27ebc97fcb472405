//! Exercise domain model.
//!
//! # Invariants
//! - `name` is unique (case-sensitive) and at most 150 characters.
//! - Text fields are trimmed before storage; blank optional fields are `None`.
//! - `last_session` is derived at query time and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Row identifier of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub i64);

impl Display for ExerciseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exercise as listed in the master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub body_part: Option<String>,
    pub equipment: Option<String>,
    /// Free-form progression note, e.g. "Add Elevation".
    pub notes: Option<String>,
    /// Target muscle label shown next to the name.
    pub subgroup: Option<String>,
    /// Latest session date for this exercise, `None` before the first session.
    pub last_session: Option<NaiveDate>,
}

impl Exercise {
    /// Heading used when the exercise is selected: `name (subgroup)`, falling
    /// back to the body part when no subgroup is set.
    pub fn display_label(&self) -> String {
        match self.subgroup.as_deref().or(self.body_part.as_deref()) {
            Some(group) => format!("{} ({group})", self.name),
            None => self.name.clone(),
        }
    }

    /// Case-insensitive substring match over name, body part, notes and
    /// subgroup. A blank needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.name.as_str()),
            self.body_part.as_deref(),
            self.notes.as_deref(),
            self.subgroup.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Mutable exercise fields, used for both insert and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseFields {
    pub name: String,
    pub body_part: Option<String>,
    pub equipment: Option<String>,
    pub notes: Option<String>,
    pub subgroup: Option<String>,
}

impl ExerciseFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn body_part(mut self, value: impl Into<String>) -> Self {
        self.body_part = Some(value.into());
        self
    }

    pub fn equipment(mut self, value: impl Into<String>) -> Self {
        self.equipment = Some(value.into());
        self
    }

    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());
        self
    }

    pub fn subgroup(mut self, value: impl Into<String>) -> Self {
        self.subgroup = Some(value.into());
        self
    }

    /// Returns a copy with every field trimmed and blank optionals dropped.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            body_part: normalize_optional(self.body_part.as_deref()),
            equipment: normalize_optional(self.equipment.as_deref()),
            notes: normalize_optional(self.notes.as_deref()),
            subgroup: normalize_optional(self.subgroup.as_deref()),
        }
    }
}

/// Trims an optional text field; blank input becomes `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{Exercise, ExerciseFields, ExerciseId};

    fn pull_ups() -> Exercise {
        Exercise {
            id: ExerciseId(1),
            name: "Pull Ups".to_string(),
            body_part: Some("Back".to_string()),
            equipment: Some("Bodyweight".to_string()),
            notes: Some("Slow and Controlled".to_string()),
            subgroup: Some("Vertical Mower".to_string()),
            last_session: None,
        }
    }

    #[test]
    fn normalized_trims_and_drops_blank_optionals() {
        let fields = ExerciseFields::new("  Bench  ")
            .body_part(" Chest ")
            .equipment("   ")
            .notes("");
        let normalized = fields.normalized();
        assert_eq!(normalized.name, "Bench");
        assert_eq!(normalized.body_part.as_deref(), Some("Chest"));
        assert_eq!(normalized.equipment, None);
        assert_eq!(normalized.notes, None);
        assert_eq!(normalized.subgroup, None);
    }

    #[test]
    fn search_matches_any_text_field_case_insensitively() {
        let exercise = pull_ups();
        assert!(exercise.matches_search("pull"));
        assert!(exercise.matches_search("BACK"));
        assert!(exercise.matches_search("controlled"));
        assert!(exercise.matches_search("mower"));
        assert!(exercise.matches_search("   "));
        assert!(!exercise.matches_search("bodyweight"));
    }

    #[test]
    fn display_label_prefers_subgroup_then_body_part() {
        let mut exercise = pull_ups();
        assert_eq!(exercise.display_label(), "Pull Ups (Vertical Mower)");
        exercise.subgroup = None;
        assert_eq!(exercise.display_label(), "Pull Ups (Back)");
        exercise.body_part = None;
        assert_eq!(exercise.display_label(), "Pull Ups");
    }
}
