use super::super::domain::{Band, GroupKey};
use crate::i18n::Locale;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub group: GroupKey,
    pub label: String,
    pub mean_text: String,
    pub band: Band,
    pub band_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalBlock {
    pub label: String,
    pub mean_text: String,
    pub band: Band,
    pub band_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Affirmative,
    Encouraging,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncouragementView {
    pub tone: Tone,
    pub text: String,
}

/// The export control embedded at the bottom of a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerView {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableSummary {
    pub locale: Locale,
    pub title: String,
    pub subject_rows: Vec<SummaryRow>,
    pub group_rows: Vec<GroupRow>,
    pub total: TotalBlock,
    pub message: EncouragementView,
    pub closing: String,
    pub trigger: TriggerView,
}
