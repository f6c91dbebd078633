use crate::i18n::keys;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Fixed arity of every score group. Also the divisor of the group mean.
pub const SLOT_COUNT: usize = 6;
pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Movement,
    Outcome,
}

impl GroupKey {
    pub const fn ordered() -> [Self; 2] {
        [Self::Movement, Self::Outcome]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movement => "movement",
            Self::Outcome => "outcome",
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Movement => keys::MOVEMENT_TEST,
            Self::Outcome => keys::OUTCOME_TEST,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "movement" | "gerak" => Some(Self::Movement),
            "outcome" | "hasil" => Some(Self::Outcome),
            _ => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-based slot position inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot(u8);

impl Slot {
    pub fn new(number: usize) -> Option<Self> {
        (1..=SLOT_COUNT)
            .contains(&number)
            .then_some(Self(number as u8))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (1..=SLOT_COUNT as u8).map(Self)
    }

    pub const fn number(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// Input field identifier such as `movement_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub group: GroupKey,
    pub slot: Slot,
}

impl FieldKey {
    pub const fn new(group: GroupKey, slot: Slot) -> Self {
        Self { group, slot }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (group, slot) = raw.trim().split_once('_')?;
        let group = GroupKey::parse(group)?;
        let slot = slot.parse::<usize>().ok().and_then(Slot::new)?;
        Some(Self { group, slot })
    }

    pub fn for_group(group: GroupKey) -> impl Iterator<Item = Self> {
        Slot::all().map(move |slot| Self { group, slot })
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.group, self.slot.number())
    }
}

impl Serialize for FieldKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A score inside the closed `[0, 30]` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScoreEntry(u8);

impl ScoreEntry {
    pub fn new(value: i64) -> Option<Self> {
        (MIN_SCORE..=MAX_SCORE)
            .contains(&value)
            .then_some(Self(value as u8))
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    BelowAverage,
    Fair,
    Good,
    Excellent,
    Invalid,
}

impl Band {
    /// Stable, locale-independent key. Doubles as the translation key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::BelowAverage => keys::BELOW_AVERAGE,
            Self::Fair => keys::FAIR,
            Self::Good => keys::GOOD,
            Self::Excellent => keys::EXCELLENT,
            Self::Invalid => keys::INVALID,
        }
    }

    pub const fn is_favorable(self) -> bool {
        matches!(self, Self::Good | Self::Excellent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Accepts the form codes `L`/`P` as well as English spellings.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "l" | "m" | "male" | "laki-laki" => Self::Male,
            "p" | "f" | "female" | "perempuan" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub const fn label_key(self) -> Option<&'static str> {
        match self {
            Self::Male => Some(keys::MALE),
            Self::Female => Some(keys::FEMALE),
            Self::Unknown => None,
        }
    }
}

/// Free text from a form field; anything unrecognised is `Unknown`, never an error.
impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: Gender,
}

impl Subject {
    pub fn new(name: impl Into<String>, age: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            gender,
        }
    }
}

/// Six-slot score collection. Empty slots are absent, never zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreGroup {
    key: GroupKey,
    slots: [Option<ScoreEntry>; SLOT_COUNT],
}

impl ScoreGroup {
    pub const fn new(key: GroupKey) -> Self {
        Self {
            key,
            slots: [None; SLOT_COUNT],
        }
    }

    pub const fn key(&self) -> GroupKey {
        self.key
    }

    pub fn get(&self, slot: Slot) -> Option<ScoreEntry> {
        self.slots[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, entry: Option<ScoreEntry>) {
        self.slots[slot.index()] = entry;
    }

    pub fn entries(&self) -> impl Iterator<Item = ScoreEntry> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = [None; SLOT_COUNT];
    }
}
