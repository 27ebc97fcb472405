//! Training sessions and the pending session draft.
//!
//! # Responsibility
//! - Define persisted session rows and the history summary read model.
//! - Provide [`SessionDraft`], the buffered set list composed before saving.
//!
//! # Invariants
//! - Draft set indices are always contiguous `1..=len`, in insertion order.
//! - A draft is only persisted when it holds at least one set.

use crate::model::exercise::ExerciseId;
use crate::model::set::{WeightUnit, WorkoutSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Row identifier of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One dated training session of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub exercise_id: ExerciseId,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Progress-history row: a session with its headline (first) set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session: Session,
    /// Lowest-index set, `None` only for sessions saved without sets by
    /// older databases.
    pub first_set: Option<WorkoutSet>,
    pub set_count: u32,
}

/// A set buffered in a [`SessionDraft`], not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub set_index: u32,
    pub weight: f64,
    pub reps: u32,
    pub rir: Option<u32>,
    pub unit: WeightUnit,
}

/// Session being composed by the user.
///
/// Owned by the presentation layer and handed to
/// [`WorkoutStore::save_session`](crate::store::WorkoutStore::save_session),
/// which writes the session and all its sets in one transaction. A failed save
/// leaves the draft untouched so the user can retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub date: NaiveDate,
    pub notes: String,
    sets: Vec<SetEntry>,
}

impl SessionDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            notes: String::new(),
            sets: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Starts a new draft dated `date` that repeats the sets of a saved
    /// session, so the user can log "same as last time" and adjust.
    pub fn from_existing(date: NaiveDate, sets: &[WorkoutSet]) -> Self {
        let mut draft = Self::new(date);
        let mut ordered: Vec<&WorkoutSet> = sets.iter().collect();
        ordered.sort_by_key(|set| set.set_index);
        for set in ordered {
            draft.push_set(set.weight, set.reps, set.rir, set.unit);
        }
        draft
    }

    /// Appends a set and returns its 1-based index.
    pub fn push_set(&mut self, weight: f64, reps: u32, rir: Option<u32>, unit: WeightUnit) -> u32 {
        let set_index = self.next_index();
        self.sets.push(SetEntry {
            set_index,
            weight,
            reps,
            rir,
            unit,
        });
        set_index
    }

    /// Removes the set at `set_index` and renumbers the following sets.
    ///
    /// Returns `None` (and leaves the draft unchanged) when no such index
    /// exists.
    pub fn remove_set(&mut self, set_index: u32) -> Option<SetEntry> {
        let position = self
            .sets
            .iter()
            .position(|entry| entry.set_index == set_index)?;
        let removed = self.sets.remove(position);
        self.renumber();
        Some(removed)
    }

    pub fn sets(&self) -> &[SetEntry] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Drops all buffered sets, keeping date and notes.
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    fn next_index(&self) -> u32 {
        u32::try_from(self.sets.len()).map_or(u32::MAX, |len| len.saturating_add(1))
    }

    fn renumber(&mut self) {
        for (set_index, entry) in (1..).zip(self.sets.iter_mut()) {
            entry.set_index = set_index;
        }
    }
}
