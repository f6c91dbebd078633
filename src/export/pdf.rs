//! A4 portrait assembly of a captured bitmap.

use super::ExportError;
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;
/// Distance from the top edge of every page to the top of the image.
pub const TOP_PADDING_MM: f64 = 20.0;

const POINTS_PER_MM: f64 = 72.0 / 25.4;
const JPEG_QUALITY: u8 = 90;
const PRODUCER: &str = "rallyscore";

/// How content taller than one page is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageMode {
    /// Split across as many A4 pages as needed.
    #[default]
    Paginated,
    /// One page, taller than A4 when the image needs it.
    Continuous,
}

impl PageMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paginated => "paginated",
            Self::Continuous => "continuous",
        }
    }
}

/// One page's share of the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub source_y: u32,
    pub source_height: u32,
    pub page_height_mm: f64,
    pub image_height_mm: f64,
}

#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created: DateTime<Utc>,
}

/// Splits a `width` x `height` pixel image scaled to the full A4 width.
pub fn plan_pages(width: u32, height: u32, mode: PageMode) -> Vec<PageSlice> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mm_per_px = A4_WIDTH_MM / f64::from(width);
    let image_height_mm = f64::from(height) * mm_per_px;

    match mode {
        PageMode::Continuous => vec![PageSlice {
            source_y: 0,
            source_height: height,
            page_height_mm: A4_HEIGHT_MM.max(TOP_PADDING_MM + image_height_mm),
            image_height_mm,
        }],
        PageMode::Paginated => {
            let usable_mm = A4_HEIGHT_MM - TOP_PADDING_MM;
            let rows_per_page = ((usable_mm / mm_per_px).floor() as u32).max(1);
            let mut slices = Vec::new();
            let mut source_y = 0;
            while source_y < height {
                let source_height = rows_per_page.min(height - source_y);
                slices.push(PageSlice {
                    source_y,
                    source_height,
                    page_height_mm: A4_HEIGHT_MM,
                    image_height_mm: f64::from(source_height) * mm_per_px,
                });
                source_y += source_height;
            }
            slices
        }
    }
}

/// Builds the PDF bytes and returns them with the page count.
pub fn assemble(
    image: &RgbImage,
    mode: PageMode,
    info: &DocumentInfo,
) -> Result<(Vec<u8>, usize), ExportError> {
    let slices = plan_pages(image.width(), image.height(), mode);
    if slices.is_empty() {
        return Err(ExportError::Assembly("captured image is empty".to_string()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(slices.len());

    for slice in &slices {
        let jpeg = encode_slice(image, slice)?;
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width()),
                "Height" => i64::from(slice.source_height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let page_height_pt = slice.page_height_mm * POINTS_PER_MM;
        let image_width_pt = A4_WIDTH_MM * POINTS_PER_MM;
        let image_height_pt = slice.image_height_mm * POINTS_PER_MM;
        let image_bottom_pt = page_height_pt - TOP_PADDING_MM * POINTS_PER_MM - image_height_pt;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(image_width_pt),
                        real(0.0),
                        real(0.0),
                        real(image_height_pt),
                        real(0.0),
                        real(image_bottom_pt),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|err| ExportError::Assembly(format!("content stream: {err}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(image_width_pt), real(page_height_pt)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(info.title.as_str()),
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(
            info.created.format("D:%Y%m%d%H%M%SZ").to_string(),
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| ExportError::Assembly(format!("write pdf: {err}")))?;
    Ok((bytes, page_count))
}

fn encode_slice(image: &RgbImage, slice: &PageSlice) -> Result<Vec<u8>, ExportError> {
    let cropped =
        imageops::crop_imm(image, 0, slice.source_y, image.width(), slice.source_height).to_image();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&cropped)
        .map_err(|err| ExportError::Assembly(format!("encode page image: {err}")))?;
    Ok(buffer)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}
