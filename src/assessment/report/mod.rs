pub mod views;

use super::aggregate::format_mean;
use super::domain::{GroupKey, Subject};
use super::session::ScoreResult;
use crate::i18n::{keys, Catalog, Locale};

pub use views::{
    EncouragementView, GroupRow, RenderableSummary, SummaryRow, Tone, TotalBlock, TriggerView,
};

/// Placeholder for values that have nothing to show in any locale.
pub const EMPTY_DISPLAY: &str = "-";

/// Projects a computed result into a localized summary.
///
/// Rendering is a pure function of its arguments, so switching locale and
/// rendering again never changes the numeric text.
#[derive(Debug, Clone, Copy)]
pub struct ResultPresenter<'a> {
    catalog: &'a Catalog,
}

impl<'a> ResultPresenter<'a> {
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn render(
        &self,
        subject: &Subject,
        result: &ScoreResult,
        locale: Locale,
    ) -> RenderableSummary {
        let t = |key: &'static str| self.catalog.lookup(locale, key).to_string();

        let gender = subject
            .gender
            .label_key()
            .map(t)
            .unwrap_or_else(|| EMPTY_DISPLAY.to_string());

        let subject_rows = vec![
            SummaryRow {
                label: t(keys::FULL_NAME),
                value: subject.name.clone(),
            },
            SummaryRow {
                label: t(keys::AGE),
                value: subject.age.clone(),
            },
            SummaryRow {
                label: t(keys::GENDER),
                value: gender,
            },
        ];

        let group_rows = GroupKey::ordered()
            .into_iter()
            .map(|group| {
                let score = result.group(group);
                GroupRow {
                    group,
                    label: t(group.label_key()),
                    mean_text: format_mean(score.mean),
                    band: score.band,
                    band_label: t(score.band.key()),
                }
            })
            .collect();

        let (tone, message_key) = if result.total_band.is_favorable() {
            (Tone::Affirmative, keys::MSG_AFFIRMATIVE)
        } else {
            (Tone::Encouraging, keys::MSG_ENCOURAGING)
        };

        RenderableSummary {
            locale,
            title: t(keys::RESULT_TITLE),
            subject_rows,
            group_rows,
            total: TotalBlock {
                label: t(keys::FINAL_TOTAL_SCORE),
                mean_text: format_mean(result.total_mean),
                band: result.total_band,
                band_label: t(result.total_band.key()),
            },
            message: EncouragementView {
                tone,
                text: t(message_key),
            },
            closing: t(keys::THANK_YOU),
            trigger: TriggerView {
                label: t(keys::DOWNLOAD_PDF),
                enabled: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{Band, Gender};
    use crate::assessment::session::GroupScore;

    fn result(movement: f64, outcome: f64, total_band: Band) -> ScoreResult {
        ScoreResult {
            movement: GroupScore {
                mean: movement,
                band: Band::Good,
            },
            outcome: GroupScore {
                mean: outcome,
                band: Band::Fair,
            },
            total_mean: (movement + outcome) / 2.0,
            total_band,
        }
    }

    #[test]
    fn favorable_totals_select_the_affirmative_message() {
        let catalog = Catalog::builtin();
        let presenter = ResultPresenter::new(&catalog);
        let subject = Subject::new("Budi", "15", Gender::Male);

        for band in [Band::Good, Band::Excellent] {
            let summary = presenter.render(&subject, &result(20.0, 16.0, band), Locale::En);
            assert_eq!(summary.message.tone, Tone::Affirmative);
            assert_eq!(
                summary.message.text,
                catalog.lookup(Locale::En, keys::MSG_AFFIRMATIVE)
            );
        }

        for band in [Band::BelowAverage, Band::Fair, Band::Invalid] {
            let summary = presenter.render(&subject, &result(20.0, 16.0, band), Locale::En);
            assert_eq!(summary.message.tone, Tone::Encouraging);
        }
    }

    #[test]
    fn unknown_gender_renders_a_dash_in_every_locale() {
        let catalog = Catalog::builtin();
        let presenter = ResultPresenter::new(&catalog);
        let subject = Subject::new("Sari", "13", Gender::Unknown);

        for locale in Locale::ordered() {
            let summary =
                presenter.render(&subject, &result(10.0, 10.0, Band::BelowAverage), locale);
            assert_eq!(summary.subject_rows[2].value, EMPTY_DISPLAY);
        }
    }

    #[test]
    fn locale_changes_only_touch_labels() {
        let catalog = Catalog::builtin();
        let presenter = ResultPresenter::new(&catalog);
        let subject = Subject::new("Dewi", "16", Gender::Female);
        let scored = result(71.0 / 6.0, 107.0 / 6.0, Band::Fair);

        let indonesian = presenter.render(&subject, &scored, Locale::Id);
        let english = presenter.render(&subject, &scored, Locale::En);
        let again = presenter.render(&subject, &scored, Locale::Id);

        assert_eq!(indonesian, again);
        assert_eq!(indonesian.total.mean_text, english.total.mean_text);
        for (id_row, en_row) in indonesian.group_rows.iter().zip(&english.group_rows) {
            assert_eq!(id_row.mean_text, en_row.mean_text);
            assert_eq!(id_row.band, en_row.band);
        }
        assert_eq!(indonesian.subject_rows[2].value, "Perempuan");
        assert_eq!(english.subject_rows[2].value, "Female");
        assert_ne!(indonesian.title, english.title);
    }
}
