use image::RgbImage;
use lopdf::{Document, Object};
use rallyscore::assessment::{
    AssessmentForm, CollectedNotices, ExportOutcome, FieldKey, Gender, GroupKey, Subject,
};
use rallyscore::config::ExportConfig;
use rallyscore::export::{
    BitmapRasterizer, DocumentExporter, ExportError, PageMode, Rasterizer, Snapshot,
    REFERENCE_WIDTH, SUPERSAMPLE,
};
use rallyscore::i18n::{Catalog, Locale};
use std::sync::{Arc, Mutex};

struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    async fn rasterize(&self, _snapshot: Snapshot, _scale: u32) -> Result<RgbImage, ExportError> {
        Err(ExportError::Capture("surface lost".to_string()))
    }
}

/// Yields a few times before painting so callers can observe the busy state.
struct SlowRasterizer {
    yields: usize,
}

impl Rasterizer for SlowRasterizer {
    async fn rasterize(&self, snapshot: Snapshot, scale: u32) -> Result<RgbImage, ExportError> {
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
        BitmapRasterizer::default().paint(&snapshot, scale)
    }
}

/// Remembers the layout each capture was asked for.
#[derive(Default)]
struct RecordingRasterizer {
    seen: Mutex<Vec<(u32, u32, u32)>>,
}

impl Rasterizer for RecordingRasterizer {
    async fn rasterize(&self, snapshot: Snapshot, scale: u32) -> Result<RgbImage, ExportError> {
        self.seen
            .lock()
            .expect("recording mutex")
            .push((snapshot.width(), snapshot.columns(), scale));
        BitmapRasterizer::default().paint(&snapshot, scale)
    }
}

fn scored_form(name: &str, locale: Locale) -> (AssessmentForm, Arc<CollectedNotices>) {
    let notices = Arc::new(CollectedNotices::default());
    let mut form = AssessmentForm::new(Arc::new(Catalog::builtin()), notices.clone(), locale);
    form.set_subject(Subject::new(name, "16", Gender::Female));
    for group in GroupKey::ordered() {
        for field in FieldKey::for_group(group) {
            form.input(field, "21");
        }
    }
    form.submit().expect("both groups scored");
    (form, notices)
}

fn info_title(document: &Document) -> Vec<u8> {
    let info_id = document
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .expect("info dictionary");
    document
        .get_object(info_id)
        .and_then(Object::as_dict)
        .and_then(|dict| dict.get(b"Title"))
        .and_then(Object::as_str)
        .expect("title entry")
        .to_vec()
}

#[tokio::test]
async fn export_produces_a_named_a4_document() {
    let (form, notices) = scored_form("Jane  O'Brien!!", Locale::Id);
    let exporter = DocumentExporter::with_config(ExportConfig::default());

    let document = match form.export(&exporter).await.expect("export succeeds") {
        ExportOutcome::Exported(document) => document,
        other => panic!("expected an exported document, got {other:?}"),
    };

    assert_eq!(document.filename, "Hasil-Tes-Tenis-Meja-Jane_O_Brien_.pdf");
    assert!(notices.is_empty());
    assert!(form.trigger().is_enabled());

    let pdf = Document::load_mem(&document.bytes).expect("valid pdf");
    assert_eq!(pdf.get_pages().len(), document.page_count);
    assert_eq!(info_title(&pdf), b"Hasil-Tes-Tenis-Meja-Jane_O_Brien_".to_vec());

    let (_, first_page) = pdf.get_pages().into_iter().next().expect("one page");
    let media_box = pdf
        .get_object(first_page)
        .and_then(Object::as_dict)
        .and_then(|page| page.get(b"MediaBox"))
        .and_then(Object::as_array)
        .expect("media box")
        .clone();
    let width = media_box[2].as_float().expect("width");
    let height = media_box[3].as_float().expect("height");
    // A4 portrait in points.
    assert!((width - 595.28).abs() < 0.5, "width {width}");
    assert!((height - 841.89).abs() < 0.5, "height {height}");
}

#[tokio::test]
async fn continuous_mode_keeps_everything_on_one_page() {
    let (form, _) = scored_form("Ayu", Locale::En);
    let exporter = DocumentExporter::with_config(ExportConfig {
        page_mode: PageMode::Continuous,
        ..ExportConfig::default()
    });

    let ExportOutcome::Exported(document) = form.export(&exporter).await.expect("export succeeds")
    else {
        panic!("expected an exported document");
    };
    assert_eq!(document.page_count, 1);
}

#[tokio::test]
async fn failure_shows_one_generic_notice_and_restores_the_trigger() {
    let (form, notices) = scored_form("Budi", Locale::Id);
    let exporter = DocumentExporter::new(ExportConfig::default(), FailingRasterizer);

    let err = form.export(&exporter).await.expect_err("capture fails");
    assert_eq!(err.kind(), "capture_failure");
    assert_eq!(
        notices.messages(),
        vec!["Gagal membuat PDF. Silakan coba lagi.".to_string()]
    );

    assert!(form.trigger().is_enabled());
    let summary = form.summary().expect("result still displayed");
    assert!(summary.trigger.enabled);
    assert_eq!(summary.trigger.label, "Unduh PDF");
}

#[tokio::test]
async fn trigger_is_disabled_while_an_export_runs() {
    let (form, _) = scored_form("Rina", Locale::En);
    let exporter = DocumentExporter::new(ExportConfig::default(), SlowRasterizer { yields: 16 });

    let observe = async {
        for _ in 0..64 {
            if !form.trigger().is_enabled() {
                let label = form.summary().map(|summary| summary.trigger.label);
                let second = form.export(&exporter).await;
                return Some((label, second));
            }
            tokio::task::yield_now().await;
        }
        None
    };

    let (first, observed) = tokio::join!(form.export(&exporter), observe);
    assert!(matches!(first, Ok(ExportOutcome::Exported(_))));

    let (label, second) = observed.expect("busy state observed");
    assert_eq!(label.as_deref(), Some("Generating PDF..."));
    assert!(matches!(second, Ok(ExportOutcome::Busy)));

    assert!(form.trigger().is_enabled());
    assert_eq!(
        form.summary().map(|summary| summary.trigger.label),
        Some("Download PDF".to_string())
    );
}

#[tokio::test]
async fn nothing_is_exported_before_a_result_is_shown() {
    let notices = Arc::new(CollectedNotices::default());
    let form = AssessmentForm::new(Arc::new(Catalog::builtin()), notices.clone(), Locale::En);
    let exporter = DocumentExporter::with_config(ExportConfig::default());

    let outcome = form.export(&exporter).await.expect("no failure");
    assert_eq!(outcome, ExportOutcome::Unavailable);
    assert!(notices.is_empty());
}

#[tokio::test]
async fn filename_follows_the_displayed_subject_after_later_edits() {
    let (mut form, _) = scored_form("Alice", Locale::En);
    form.set_subject(Subject::new("Bob", "16", Gender::Male));
    let exporter = DocumentExporter::with_config(ExportConfig::default());

    let summary = form.summary().expect("result still displayed");
    assert_eq!(summary.subject_rows[0].value, "Alice");

    let ExportOutcome::Exported(document) = form.export(&exporter).await.expect("export succeeds")
    else {
        panic!("expected an exported document");
    };
    assert_eq!(document.filename, "Hasil-Tes-Tenis-Meja-Alice.pdf");
}

#[tokio::test]
async fn every_export_uses_the_fixed_desktop_layout() {
    let (form, _) = scored_form("Sari", Locale::Id);
    let exporter = DocumentExporter::new(
        ExportConfig {
            page_mode: PageMode::Continuous,
            ..ExportConfig::default()
        },
        RecordingRasterizer::default(),
    );

    form.export(&exporter).await.expect("export succeeds");
    form.export(&exporter).await.expect("export succeeds");

    let seen = exporter.rasterizer().seen.lock().expect("recording mutex").clone();
    assert_eq!(seen, vec![(REFERENCE_WIDTH, 2, SUPERSAMPLE); 2]);
    assert_eq!((REFERENCE_WIDTH, SUPERSAMPLE), (1024, 2));
}
