//! Batch scoring from a CSV roster.
//!
//! Expected header: `name,age,gender,movement_1..movement_6,outcome_1..outcome_6`.
//! Every row is replayed through an [`AssessmentForm`], so a bad cell becomes a
//! notice on that row instead of failing the whole import.

use crate::assessment::{
    AssessmentForm, CollectedNotices, FieldKey, Gender, GroupKey, NoticeSurface,
    RenderableSummary, Subject,
};
use crate::i18n::{Catalog, Locale};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of one roster row.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    /// One-based data row number, not counting the header.
    pub row: usize,
    pub subject: Subject,
    /// `None` when either group ended up empty.
    pub summary: Option<RenderableSummary>,
    /// Localized notices, prefixed with the offending field.
    pub notices: Vec<String>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: Arc<Catalog>,
        locale: Locale,
    ) -> Result<Vec<RosterEntry>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog, locale)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        catalog: Arc<Catalog>,
        locale: Locale,
    ) -> Result<Vec<RosterEntry>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entries = Vec::new();

        for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row = record?;
            entries.push(score_row(index + 1, row, catalog.clone(), locale));
        }

        info!(
            rows = entries.len(),
            scored = entries.iter().filter(|entry| entry.summary.is_some()).count(),
            "roster imported"
        );
        Ok(entries)
    }
}

fn score_row(
    row_number: usize,
    row: RosterRow,
    catalog: Arc<Catalog>,
    locale: Locale,
) -> RosterEntry {
    let notices = Arc::new(CollectedNotices::default());
    let surface: Arc<dyn NoticeSurface> = notices.clone();
    let mut form = AssessmentForm::new(catalog, surface, locale);

    let subject = Subject::new(
        row.name.clone().unwrap_or_default(),
        row.age.clone().unwrap_or_default(),
        row.gender.as_deref().map(Gender::parse).unwrap_or_default(),
    );
    form.set_subject(subject.clone());

    let mut row_notices = Vec::new();
    for group in GroupKey::ordered() {
        for field in FieldKey::for_group(group) {
            let Some(raw) = row.cell(field) else {
                continue;
            };
            let seen = notices.len();
            form.input(field, raw);
            if let Some(message) = notices.messages().get(seen) {
                row_notices.push(format!("{field}: {message}"));
                notices.dismiss();
            }
        }
    }

    let summary = form.submit();
    if summary.is_none() {
        debug!(row = row_number, "roster row left unscored");
    }

    RosterEntry {
        row: row_number,
        subject,
        summary,
        notices: row_notices,
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    movement_1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    movement_2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    movement_3: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    movement_4: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    movement_5: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    movement_6: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outcome_1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outcome_2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outcome_3: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outcome_4: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outcome_5: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outcome_6: Option<String>,
}

impl RosterRow {
    fn cell(&self, field: FieldKey) -> Option<&str> {
        let cells = match field.group {
            GroupKey::Movement => [
                &self.movement_1,
                &self.movement_2,
                &self.movement_3,
                &self.movement_4,
                &self.movement_5,
                &self.movement_6,
            ],
            GroupKey::Outcome => [
                &self.outcome_1,
                &self.outcome_2,
                &self.outcome_3,
                &self.outcome_4,
                &self.outcome_5,
                &self.outcome_6,
            ],
        };
        cells
            .get(field.slot.number() - 1)
            .and_then(|cell| cell.as_deref())
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
