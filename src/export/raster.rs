use super::font;
use super::snapshot::{Color, Node, Snapshot};
use super::ExportError;
use image::{Rgb, RgbImage};
use std::future::Future;

/// Default ceiling on the number of pixels a single capture may allocate.
pub const DEFAULT_MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Turns a laid-out snapshot into pixels at `scale` times its reference size.
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        snapshot: Snapshot,
        scale: u32,
    ) -> impl Future<Output = Result<RgbImage, ExportError>> + Send;
}

/// Paints snapshots onto an opaque white canvas with the built-in bitmap font.
#[derive(Debug, Clone)]
pub struct BitmapRasterizer {
    max_pixels: u64,
}

impl Default for BitmapRasterizer {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl BitmapRasterizer {
    pub const fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    pub fn paint(&self, snapshot: &Snapshot, scale: u32) -> Result<RgbImage, ExportError> {
        if scale == 0 {
            return Err(ExportError::Capture("scale must be at least 1".to_string()));
        }
        let width = snapshot.width().checked_mul(scale);
        let height = snapshot.height().checked_mul(scale);
        let (width, height) = match (width, height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
            _ => {
                return Err(ExportError::Capture(format!(
                    "cannot allocate a {}x{} canvas at scale {scale}",
                    snapshot.width(),
                    snapshot.height()
                )))
            }
        };
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.max_pixels {
            return Err(ExportError::Capture(format!(
                "canvas of {pixels} pixels exceeds the limit of {}",
                self.max_pixels
            )));
        }

        let mut canvas = RgbImage::from_pixel(width, height, Rgb([0xFF, 0xFF, 0xFF]));
        for node in snapshot.nodes() {
            match node {
                Node::Fill {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => fill_rect(
                    &mut canvas,
                    x * scale,
                    y * scale,
                    width * scale,
                    height * scale,
                    *color,
                ),
                Node::Text {
                    x,
                    y,
                    size,
                    color,
                    bold,
                    text,
                } => draw_text(
                    &mut canvas,
                    *x * scale,
                    *y * scale,
                    *size,
                    scale,
                    *color,
                    *bold,
                    text,
                ),
            }
        }
        Ok(canvas)
    }
}

impl Rasterizer for BitmapRasterizer {
    async fn rasterize(&self, snapshot: Snapshot, scale: u32) -> Result<RgbImage, ExportError> {
        let painter = self.clone();
        tokio::task::spawn_blocking(move || painter.paint(&snapshot, scale))
            .await
            .map_err(|err| ExportError::Capture(format!("raster task failed: {err}")))?
    }
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Color) {
    let right = x.saturating_add(width).min(canvas.width());
    let bottom = y.saturating_add(height).min(canvas.height());
    let pixel = Rgb([color.0, color.1, color.2]);
    for py in y..bottom {
        for px in x..right {
            canvas.put_pixel(px, py, pixel);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    canvas: &mut RgbImage,
    x: u32,
    y: u32,
    size: u32,
    scale: u32,
    color: Color,
    bold: bool,
    text: &str,
) {
    let dot = font::dot_size(size) * scale;
    let advance = font::CELL_WIDTH * dot;
    for (index, c) in text.chars().enumerate() {
        let origin = x + index as u32 * advance;
        for (column, bits) in font::glyph(c).iter().enumerate() {
            for row in 0..font::GLYPH_ROWS {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let dx = origin + column as u32 * dot;
                let dy = y + row * dot;
                fill_rect(canvas, dx, dy, dot, dot, color);
                if bold {
                    fill_rect(canvas, dx + scale, dy, dot, dot, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{FieldKey, Gender, GroupKey, ResultPresenter, ScoreSession, Subject};
    use crate::i18n::{Catalog, Locale};

    fn snapshot() -> Snapshot {
        let mut session = ScoreSession::new();
        for group in GroupKey::ordered() {
            for field in FieldKey::for_group(group) {
                session.validate_entry(field, "25").expect("accepted");
            }
        }
        let result = session.compute_result().expect("result");
        let catalog = Catalog::builtin();
        let summary = ResultPresenter::new(&catalog).render(
            &Subject::new("Rina", "12", Gender::Female),
            &result,
            Locale::Id,
        );
        Snapshot::capture(&summary, 1024).expect("layout")
    }

    #[test]
    fn canvas_is_supersampled_on_white() {
        let snapshot = snapshot();
        let image = BitmapRasterizer::default().paint(&snapshot, 2).expect("painted");
        assert_eq!(image.width(), snapshot.width() * 2);
        assert_eq!(image.height(), snapshot.height() * 2);
        // Bottom-right corner sits in the outer padding.
        let corner = image.get_pixel(image.width() - 1, image.height() - 1);
        assert_eq!(corner, &Rgb([0xFF, 0xFF, 0xFF]));
        // Top accent bar is painted.
        assert_eq!(image.get_pixel(0, 0), &Rgb([0x4F, 0x46, 0xE5]));
    }

    #[test]
    fn zero_scale_and_oversized_canvases_are_capture_failures() {
        let snapshot = snapshot();
        let zero = BitmapRasterizer::default().paint(&snapshot, 0).expect_err("zero scale");
        assert!(matches!(zero, ExportError::Capture(_)));

        let tiny = BitmapRasterizer::with_max_pixels(1_000).paint(&snapshot, 1).expect_err("limit");
        assert!(matches!(tiny, ExportError::Capture(_)));
    }

    #[tokio::test]
    async fn rasterize_runs_off_the_async_executor() {
        let snapshot = snapshot();
        let expected = (snapshot.width(), snapshot.height());
        let image = BitmapRasterizer::default()
            .rasterize(snapshot, 1)
            .await
            .expect("rasterized");
        assert_eq!(image.dimensions(), expected);
    }
}
