//! Set records and weight units.

use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Row identifier of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub i64);

/// Unit the weight of a set was logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Storage / display spelling (`lbs` or `kg`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Kg => "kg",
        }
    }

    /// Parses the storage spelling, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lbs" => Some(Self::Lbs),
            "kg" => Some(Self::Kg),
            _ => None,
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: SetId,
    pub session_id: SessionId,
    /// 1-based position inside the session.
    pub set_index: u32,
    pub weight: f64,
    pub reps: u32,
    /// Reps in reserve; `None` when not recorded.
    pub rir: Option<u32>,
    pub unit: WeightUnit,
}

impl Display for WorkoutSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} x {}",
            self.set_index, self.weight, self.unit, self.reps
        )?;
        if let Some(rir) = self.rir {
            write!(f, " @{rir} RIR")?;
        }
        Ok(())
    }
}

/// Previous-performance hint: the latest logged set of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastSet {
    pub weight: f64,
    pub reps: u32,
    pub rir: Option<u32>,
    pub unit: WeightUnit,
}

#[cfg(test)]
mod tests {
    use super::{SetId, WeightUnit, WorkoutSet};
    use crate::model::session::SessionId;

    #[test]
    fn unit_defaults_to_lbs_and_parses_case_insensitively() {
        assert_eq!(WeightUnit::default(), WeightUnit::Lbs);
        assert_eq!(WeightUnit::parse(" KG "), Some(WeightUnit::Kg));
        assert_eq!(WeightUnit::parse("lbs"), Some(WeightUnit::Lbs));
        assert_eq!(WeightUnit::parse("stone"), None);
    }

    #[test]
    fn unit_serializes_with_storage_spelling() {
        assert_eq!(serde_json::to_string(&WeightUnit::Kg).unwrap(), "\"kg\"");
        assert_eq!(serde_json::to_string(&WeightUnit::Lbs).unwrap(), "\"lbs\"");
    }

    #[test]
    fn display_includes_rir_only_when_present() {
        let mut set = WorkoutSet {
            id: SetId(1),
            session_id: SessionId(1),
            set_index: 2,
            weight: 100.5,
            reps: 8,
            rir: Some(2),
            unit: WeightUnit::Kg,
        };
        assert_eq!(set.to_string(), "#2 100.5 kg x 8 @2 RIR");
        set.rir = None;
        assert_eq!(set.to_string(), "#2 100.5 kg x 8");
    }
}
