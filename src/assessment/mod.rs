mod aggregate;
mod classifier;
pub mod domain;
mod form;
pub mod notice;
pub mod report;
mod session;

pub use aggregate::{format_mean, round_half_away, stats, GroupStats};
pub use classifier::classify;
pub use domain::{
    Band, FieldKey, Gender, GroupKey, ScoreEntry, ScoreGroup, Slot, Subject, MAX_SCORE, MIN_SCORE,
    SLOT_COUNT,
};
pub use form::{AssessmentForm, ExportOutcome, FieldView, FormView, GroupView};
pub use notice::{CollectedNotices, LogNotice, NoticeSurface};
pub use report::{RenderableSummary, ResultPresenter};
pub use session::{compute_result, GroupScore, ScoreResult, ScoreSession, ValidationError};
