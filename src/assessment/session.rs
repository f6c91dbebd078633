use super::aggregate::{round_half_away, stats, GroupStats};
use super::classifier::classify;
use super::domain::{Band, FieldKey, Gender, GroupKey, ScoreEntry, ScoreGroup, Subject};
use crate::i18n::keys;
use serde::Serialize;

/// Raised for any score that is not an integer in `[0, 30]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("score for {field} must be an integer between 0 and 30, got '{raw}'")]
    OutOfRange { field: FieldKey, raw: String },
}

impl ValidationError {
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => keys::VALUE_OUT_OF_RANGE,
        }
    }

    pub const fn field(&self) -> FieldKey {
        match self {
            Self::OutOfRange { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupScore {
    pub mean: f64,
    pub band: Band,
}

/// Derived aggregate of both groups. Never stored apart from the session it
/// was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub movement: GroupScore,
    pub outcome: GroupScore,
    pub total_mean: f64,
    pub total_band: Band,
}

impl ScoreResult {
    pub const fn group(&self, key: GroupKey) -> GroupScore {
        match key {
            GroupKey::Movement => self.movement,
            GroupKey::Outcome => self.outcome,
        }
    }
}

/// Combined result, or `None` when either group has no entries.
pub fn compute_result(movement: &ScoreGroup, outcome: &ScoreGroup) -> Option<ScoreResult> {
    let (
        GroupStats::Scored {
            mean: movement_mean,
            band: movement_band,
        },
        GroupStats::Scored {
            mean: outcome_mean,
            band: outcome_band,
        },
    ) = (stats(movement), stats(outcome))
    else {
        return None;
    };

    let total_mean = (movement_mean + outcome_mean) / 2.0;
    Some(ScoreResult {
        movement: GroupScore {
            mean: movement_mean,
            band: movement_band,
        },
        outcome: GroupScore {
            mean: outcome_mean,
            band: outcome_band,
        },
        total_mean,
        total_band: classify(round_half_away(total_mean)),
    })
}

/// Canonical model behind the assessment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSession {
    subject: Subject,
    movement: ScoreGroup,
    outcome: ScoreGroup,
}

impl Default for ScoreSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreSession {
    pub const fn new() -> Self {
        Self {
            subject: Subject {
                name: String::new(),
                age: String::new(),
                gender: Gender::Unknown,
            },
            movement: ScoreGroup::new(GroupKey::Movement),
            outcome: ScoreGroup::new(GroupKey::Outcome),
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.subject = subject;
    }

    pub fn group(&self, key: GroupKey) -> &ScoreGroup {
        match key {
            GroupKey::Movement => &self.movement,
            GroupKey::Outcome => &self.outcome,
        }
    }

    fn group_mut(&mut self, key: GroupKey) -> &mut ScoreGroup {
        match key {
            GroupKey::Movement => &mut self.movement,
            GroupKey::Outcome => &mut self.outcome,
        }
    }

    /// Apply raw input to a slot.
    ///
    /// Blank input clears the slot and returns `Ok(None)`. Anything that is
    /// not an integer in range clears the slot and returns the error.
    pub fn validate_entry(
        &mut self,
        field: FieldKey,
        raw: &str,
    ) -> Result<Option<ScoreEntry>, ValidationError> {
        let trimmed = raw.trim();
        let parsed = if trimmed.is_empty() {
            Ok(None)
        } else {
            trimmed
                .parse::<i64>()
                .ok()
                .and_then(ScoreEntry::new)
                .map(Some)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field,
                    raw: raw.to_string(),
                })
        };

        let group = self.group_mut(field.group);
        match parsed {
            Ok(entry) => {
                group.set(field.slot, entry);
                Ok(entry)
            }
            Err(err) => {
                group.set(field.slot, None);
                Err(err)
            }
        }
    }

    pub fn stats(&self, key: GroupKey) -> GroupStats {
        stats(self.group(key))
    }

    pub fn compute_result(&self) -> Option<ScoreResult> {
        compute_result(&self.movement, &self.outcome)
    }

    pub fn reset(&mut self) {
        self.subject = Subject::default();
        self.movement.clear();
        self.outcome.clear();
    }
}
