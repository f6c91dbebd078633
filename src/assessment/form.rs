use super::aggregate::{format_mean, GroupStats};
use super::classifier::classify;
use super::domain::{FieldKey, GroupKey, Subject};
use super::notice::NoticeSurface;
use super::report::{RenderableSummary, ResultPresenter, EMPTY_DISPLAY};
use super::session::{ScoreResult, ScoreSession};
use crate::export::{DocumentExporter, ExportError, ExportTrigger, ExportedDocument, Rasterizer};
use crate::i18n::{keys, Catalog, Locale};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One score input as currently displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: FieldKey,
    pub placeholder: String,
    pub value: Option<u8>,
    /// Localized band of the single entry; empty while the slot is blank.
    pub band_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub key: GroupKey,
    pub title: String,
    /// `"<mean> (<band>)"`, or the dash for an empty group.
    pub mean_display: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub locale: Locale,
    pub locale_label: &'static str,
    pub subject: Subject,
    pub groups: Vec<GroupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RenderableSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(ExportedDocument),
    /// No result is displayed, so there is nothing to export.
    Unavailable,
    /// Another export holds the trigger.
    Busy,
}

/// Interactive assessment form: input, live feedback, submission, locale
/// switching and export of the displayed result.
pub struct AssessmentForm {
    catalog: Arc<Catalog>,
    notices: Arc<dyn NoticeSurface>,
    session: ScoreSession,
    locale: Locale,
    displayed: Option<(Subject, ScoreResult)>,
    trigger: ExportTrigger,
}

impl AssessmentForm {
    pub fn new(catalog: Arc<Catalog>, notices: Arc<dyn NoticeSurface>, locale: Locale) -> Self {
        Self {
            catalog,
            notices,
            session: ScoreSession::new(),
            locale,
            displayed: None,
            trigger: ExportTrigger::default(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn session(&self) -> &ScoreSession {
        &self.session
    }

    pub fn trigger(&self) -> &ExportTrigger {
        &self.trigger
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.session.set_subject(subject);
    }

    /// Applies one raw field edit. Rejected values clear the slot and raise
    /// the localized out-of-range notice; the returned view reflects either
    /// outcome.
    pub fn input(&mut self, field: FieldKey, raw: &str) -> FieldView {
        if let Err(err) = self.session.validate_entry(field, raw) {
            warn!(field = %err.field(), raw, "score rejected");
            self.notices
                .show(self.catalog.lookup(self.locale, err.message_key()));
        }
        self.field_view(field)
    }

    /// Computes and displays the result. Returns `None` and keeps whatever is
    /// already displayed when either group is empty.
    pub fn submit(&mut self) -> Option<RenderableSummary> {
        let Some(result) = self.session.compute_result() else {
            debug!("submit ignored: a score group is empty");
            return None;
        };

        info!(
            movement = result.movement.mean,
            outcome = result.outcome.mean,
            total = result.total_mean,
            band = result.total_band.key(),
            "assessment scored"
        );
        self.displayed = Some((self.session.subject().clone(), result));
        self.summary()
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.displayed = None;
    }

    pub fn toggle_locale(&mut self) -> Locale {
        self.set_locale(self.locale.toggled());
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        if self.locale != locale {
            debug!(from = %self.locale, to = %locale, "locale switched");
        }
        self.locale = locale;
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.displayed.as_ref().map(|(_, result)| result)
    }

    /// The displayed result re-projected under the active locale, with the
    /// export control reflecting its live state.
    pub fn summary(&self) -> Option<RenderableSummary> {
        let (subject, result) = self.displayed.as_ref()?;
        let mut summary = ResultPresenter::new(&self.catalog).render(subject, result, self.locale);
        summary.trigger.label = self
            .catalog
            .lookup(self.locale, self.trigger.label_key())
            .to_string();
        summary.trigger.enabled = self.trigger.is_enabled();
        Some(summary)
    }

    pub fn view(&self) -> FormView {
        let groups = GroupKey::ordered()
            .into_iter()
            .map(|group| GroupView {
                key: group,
                title: self.t(group.label_key()).to_string(),
                mean_display: self.mean_display(group),
                fields: FieldKey::for_group(group)
                    .map(|field| self.field_view(field))
                    .collect(),
            })
            .collect();

        FormView {
            locale: self.locale,
            locale_label: self.locale.display_name(),
            subject: self.session.subject().clone(),
            groups,
            result: self.summary(),
        }
    }

    /// Exports the displayed result. The trigger stays disabled for the whole
    /// call and is released on every exit path.
    pub async fn export<R: Rasterizer>(
        &self,
        exporter: &DocumentExporter<R>,
    ) -> Result<ExportOutcome, ExportError> {
        let (Some(summary), Some((subject, _))) = (self.summary(), self.displayed.as_ref()) else {
            return Ok(ExportOutcome::Unavailable);
        };
        let Some(_engaged) = self.trigger.engage() else {
            debug!("export already running");
            return Ok(ExportOutcome::Busy);
        };

        // The filename follows the subject frozen at submit, like the content.
        match exporter.export(&summary, &subject.name).await {
            Ok(document) => Ok(ExportOutcome::Exported(document)),
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "export failed");
                self.notices.show(self.t(err.notice_key()));
                Err(err)
            }
        }
    }

    fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog.lookup(self.locale, key)
    }

    fn field_view(&self, field: FieldKey) -> FieldView {
        let entry = self.session.group(field.group).get(field.slot);
        FieldView {
            key: field,
            placeholder: self.t(keys::SCORE_PLACEHOLDER).to_string(),
            value: entry.map(|entry| entry.value()),
            band_label: entry
                .map(|entry| self.t(classify(i64::from(entry.value())).key()).to_string())
                .unwrap_or_default(),
        }
    }

    fn mean_display(&self, group: GroupKey) -> String {
        match self.session.stats(group) {
            GroupStats::Empty => EMPTY_DISPLAY.to_string(),
            GroupStats::Scored { mean, band } => {
                format!("{} ({})", format_mean(mean), self.t(band.key()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{Band, Gender, Slot};
    use crate::assessment::notice::CollectedNotices;

    fn form(locale: Locale) -> (AssessmentForm, Arc<CollectedNotices>) {
        let notices = Arc::new(CollectedNotices::default());
        let form = AssessmentForm::new(Arc::new(Catalog::builtin()), notices.clone(), locale);
        (form, notices)
    }

    fn field(group: GroupKey, slot: usize) -> FieldKey {
        FieldKey::new(group, Slot::new(slot).expect("slot in range"))
    }

    #[test]
    fn rejected_input_clears_the_slot_and_raises_a_notice() {
        let (mut form, notices) = form(Locale::En);
        let movement_1 = field(GroupKey::Movement, 1);

        let accepted = form.input(movement_1, "24");
        assert_eq!(accepted.value, Some(24));
        assert_eq!(accepted.band_label, "Excellent");

        let rejected = form.input(movement_1, "31");
        assert_eq!(rejected.value, None);
        assert_eq!(rejected.band_label, "");
        assert_eq!(notices.len(), 1);

        form.input(movement_1, "abc");
        assert_eq!(notices.len(), 2);
        assert_eq!(notices.messages()[0], notices.messages()[1]);
        assert_eq!(form.view().groups[0].mean_display, EMPTY_DISPLAY);
    }

    #[test]
    fn group_mean_display_divides_by_six() {
        let (mut form, _) = form(Locale::En);
        form.input(field(GroupKey::Outcome, 1), "30");
        let view = form.view();
        assert_eq!(view.groups[1].mean_display, "5.0 (Below Average)");
        assert_eq!(view.groups[0].mean_display, EMPTY_DISPLAY);
    }

    #[test]
    fn submit_with_an_empty_group_keeps_the_previous_result() {
        let (mut form, _) = form(Locale::Id);
        form.set_subject(Subject::new("Budi", "15", Gender::Male));
        for slot in 1..=6 {
            form.input(field(GroupKey::Movement, slot), "20");
            form.input(field(GroupKey::Outcome, slot), "20");
        }
        let first = form.submit().expect("both groups scored");
        assert_eq!(first.total.band, Band::Good);

        for slot in 1..=6 {
            form.input(field(GroupKey::Outcome, slot), "");
        }
        assert!(form.submit().is_none());
        assert_eq!(form.summary(), Some(first));
    }

    #[test]
    fn locale_toggle_reprojects_without_recomputing() {
        let (mut form, _) = form(Locale::Id);
        for slot in 1..=6 {
            form.input(field(GroupKey::Movement, slot), "17");
            form.input(field(GroupKey::Outcome, slot), if slot == 1 { "18" } else { "17" });
        }
        let before = form.submit().expect("scored");

        assert_eq!(form.toggle_locale(), Locale::En);
        let english = form.summary().expect("still displayed");
        assert_eq!(form.toggle_locale(), Locale::Id);
        let after = form.summary().expect("still displayed");

        assert_eq!(before, after);
        assert_eq!(english.total.mean_text, before.total.mean_text);
        assert_ne!(english.title, before.title);
        assert_eq!(form.view().locale_label, "Indonesia");
    }

    #[test]
    fn reset_hides_the_result_and_empties_groups() {
        let (mut form, _) = form(Locale::En);
        for slot in 1..=6 {
            form.input(field(GroupKey::Movement, slot), "10");
            form.input(field(GroupKey::Outcome, slot), "10");
        }
        assert!(form.submit().is_some());

        form.reset();
        let view = form.view();
        assert!(view.result.is_none());
        assert!(view
            .groups
            .iter()
            .all(|group| group.mean_display == EMPTY_DISPLAY));
        assert!(form.submit().is_none());
    }
}
