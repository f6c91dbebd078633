//! Turns a rendered summary into a downloadable A4 document.
//!
//! The pipeline runs in three stages: an off-document [`Snapshot`] laid out
//! at [`REFERENCE_WIDTH`], a bitmap supersampled by [`SUPERSAMPLE`] from a
//! [`Rasterizer`], and a paginated PDF assembled by [`pdf::assemble`].

pub mod font;
pub mod pdf;
pub mod raster;
pub mod snapshot;
pub mod trigger;

use crate::assessment::RenderableSummary;
use crate::config::ExportConfig;
use crate::i18n::keys;
use chrono::Utc;
use tracing::{debug, info};

pub use pdf::{DocumentInfo, PageMode};
pub use raster::{BitmapRasterizer, Rasterizer};
pub use snapshot::Snapshot;
pub use trigger::{EngagedTrigger, ExportTrigger};

/// Layout width of the off-document snapshot, in CSS pixels. Wide enough for
/// the two-column grid regardless of the caller's viewport.
pub const REFERENCE_WIDTH: u32 = 1024;
/// Bitmap pixels per layout pixel.
pub const SUPERSAMPLE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("failed to lay out summary: {0}")]
    Render(String),
    #[error("failed to capture summary bitmap: {0}")]
    Capture(String),
    #[error("failed to assemble pdf: {0}")]
    Assembly(String),
}

impl ExportError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Render(_) => "render_failure",
            Self::Capture(_) => "capture_failure",
            Self::Assembly(_) => "assembly_failure",
        }
    }

    /// Every failure surfaces the same generic notice.
    pub const fn notice_key(&self) -> &'static str {
        keys::EXPORT_FAILED
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[derive(Debug, Clone)]
pub struct DocumentExporter<R> {
    config: ExportConfig,
    rasterizer: R,
}

impl DocumentExporter<BitmapRasterizer> {
    pub fn with_config(config: ExportConfig) -> Self {
        Self::new(config, BitmapRasterizer::default())
    }
}

impl<R: Rasterizer> DocumentExporter<R> {
    pub const fn new(config: ExportConfig, rasterizer: R) -> Self {
        Self { config, rasterizer }
    }

    pub fn settings(&self) -> &ExportConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub async fn export(
        &self,
        summary: &RenderableSummary,
        subject_name: &str,
    ) -> Result<ExportedDocument, ExportError> {
        let snapshot = Snapshot::capture(summary, REFERENCE_WIDTH)?;
        debug!(
            width = snapshot.width(),
            height = snapshot.height(),
            columns = snapshot.columns(),
            "summary snapshot laid out"
        );

        let bitmap = self
            .rasterizer
            .rasterize(snapshot, SUPERSAMPLE)
            .await?;

        let filename = document_filename(&self.config.filename_prefix, subject_name);
        let info = DocumentInfo {
            title: filename.trim_end_matches(".pdf").to_string(),
            created: Utc::now(),
        };
        let (bytes, page_count) = pdf::assemble(&bitmap, self.config.page_mode, &info)?;

        info!(
            %filename,
            pages = page_count,
            mode = self.config.page_mode.label(),
            bytes = bytes.len(),
            "summary exported"
        );

        Ok(ExportedDocument {
            filename,
            bytes,
            page_count,
        })
    }
}

/// Replaces every run of characters outside `[A-Za-z0-9]` with one underscore.
pub fn sanitize_subject_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            sanitized.push(c);
        } else if !sanitized.ends_with('_') {
            sanitized.push('_');
        }
    }
    sanitized
}

pub fn document_filename(prefix: &str, subject_name: &str) -> String {
    format!("{prefix}-{}.pdf", sanitize_subject_name(subject_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizing_collapses_runs_of_unsafe_characters() {
        assert_eq!(sanitize_subject_name("Budi Santoso"), "Budi_Santoso");
        assert_eq!(sanitize_subject_name("Ana  Maria!!"), "Ana_Maria_");
        assert_eq!(sanitize_subject_name("José"), "Jos_");
        assert_eq!(sanitize_subject_name("a__b"), "a_b");
        assert_eq!(sanitize_subject_name(""), "");
    }

    #[test]
    fn filename_uses_the_configured_prefix() {
        assert_eq!(
            document_filename("Hasil-Tes-Tenis-Meja", "Budi Santoso"),
            "Hasil-Tes-Tenis-Meja-Budi_Santoso.pdf"
        );
        assert_eq!(
            document_filename("Hasil-Tes-Tenis-Meja", ""),
            "Hasil-Tes-Tenis-Meja-.pdf"
        );
    }

    #[test]
    fn every_failure_maps_to_the_generic_notice() {
        for err in [
            ExportError::Render("x".into()),
            ExportError::Capture("x".into()),
            ExportError::Assembly("x".into()),
        ] {
            assert_eq!(err.notice_key(), keys::EXPORT_FAILED);
        }
        assert_eq!(ExportError::Capture("x".into()).kind(), "capture_failure");
    }
}
