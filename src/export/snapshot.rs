//! Off-document layout of a rendered summary.
//!
//! The snapshot is laid out at a fixed reference width regardless of where
//! the summary was displayed, and it never contains the export control.

use super::font;
use super::ExportError;
use crate::assessment::report::{RenderableSummary, Tone};
use crate::assessment::GroupKey;

/// Widths at or above this use the two-column desktop grid.
pub const DESKTOP_BREAKPOINT: u32 = 768;

const PADDING: u32 = 32;
const ACCENT_HEIGHT: u32 = 4;
const COLUMN_GAP: u32 = 32;
const ROW_GAP: u32 = 16;
const ROW_PADDING: u32 = 8;
const MIN_CONTENT_WIDTH: u32 = 240;
const TOTAL_PADDING: u32 = 24;
const SECTION_GAP: u32 = 24;
const INLINE_GAP: u32 = 6;

const TITLE_SIZE: u32 = 24;
const BODY_SIZE: u32 = 16;
const SMALL_SIZE: u32 = 14;
const CAPTION_SIZE: u32 = 12;
const TOTAL_VALUE_SIZE: u32 = 36;
const BAND_SIZE: u32 = 18;
const MESSAGE_SIZE: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

pub mod palette {
    use super::Color;

    pub const WHITE: Color = Color(0xFF, 0xFF, 0xFF);
    pub const SLATE_100: Color = Color(0xF1, 0xF5, 0xF9);
    pub const SLATE_400: Color = Color(0x94, 0xA3, 0xB8);
    pub const SLATE_500: Color = Color(0x64, 0x74, 0x8B);
    pub const SLATE_700: Color = Color(0x33, 0x41, 0x55);
    pub const SLATE_800: Color = Color(0x1E, 0x29, 0x3B);
    pub const INDIGO_50: Color = Color(0xEE, 0xF2, 0xFF);
    pub const INDIGO_500: Color = Color(0x63, 0x66, 0xF1);
    pub const INDIGO_600: Color = Color(0x4F, 0x46, 0xE5);
    pub const INDIGO_700: Color = Color(0x43, 0x38, 0xCA);
    pub const INDIGO_800: Color = Color(0x37, 0x30, 0xA3);
    pub const EMERALD_600: Color = Color(0x05, 0x96, 0x69);
    pub const BLUE_600: Color = Color(0x25, 0x63, 0xEB);
    pub const ORANGE_600: Color = Color(0xEA, 0x58, 0x0C);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Fill {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Color,
    },
    /// `y` is the top of the glyph box.
    Text {
        x: u32,
        y: u32,
        size: u32,
        color: Color,
        bold: bool,
        text: String,
    },
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    columns: u32,
    nodes: Vec<Node>,
}

impl Snapshot {
    /// Lay out `summary` at `reference_width` pixels.
    pub fn capture(summary: &RenderableSummary, reference_width: u32) -> Result<Self, ExportError> {
        if reference_width < 2 * PADDING + MIN_CONTENT_WIDTH {
            return Err(ExportError::Render(format!(
                "reference width {reference_width}px leaves no room for content"
            )));
        }

        let mut layout = Layout::new(reference_width);
        layout.fill(0, reference_width, ACCENT_HEIGHT, palette::INDIGO_600);
        layout.y = ACCENT_HEIGHT + PADDING;

        layout.paragraph(&summary.title, TITLE_SIZE, palette::SLATE_800, true, Align::Center);
        layout.y += ROW_GAP;
        layout.fill(PADDING, layout.content_width(), 1, palette::SLATE_100);
        layout.y += 1 + SECTION_GAP;

        layout.grid(summary);
        layout.y += SECTION_GAP;

        layout.total_block(summary);
        layout.y += SECTION_GAP;

        let tone_color = match summary.message.tone {
            Tone::Affirmative => palette::EMERALD_600,
            Tone::Encouraging => palette::ORANGE_600,
        };
        let quoted = format!("\"{}\"", summary.message.text);
        layout.paragraph(&quoted, MESSAGE_SIZE, tone_color, false, Align::Center);
        layout.y += ROW_GAP;
        layout.paragraph(&summary.closing, SMALL_SIZE, palette::SLATE_400, false, Align::Center);
        layout.y += PADDING;

        Ok(layout.finish())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Text { text, .. } => Some(text.as_str()),
            Node::Fill { .. } => None,
        })
    }
}

struct Layout {
    width: u32,
    columns: u32,
    y: u32,
    nodes: Vec<Node>,
}

/// One grid cell: a label on the left and one or more value runs on the right.
struct Cell<'a> {
    label: &'a str,
    value: &'a str,
    value_color: Color,
    band: Option<String>,
}

impl Layout {
    fn new(width: u32) -> Self {
        let columns = if width >= DESKTOP_BREAKPOINT { 2 } else { 1 };
        Self {
            width,
            columns,
            y: 0,
            nodes: Vec::new(),
        }
    }

    fn content_width(&self) -> u32 {
        self.width - 2 * PADDING
    }

    fn column_width(&self) -> u32 {
        (self.content_width() - COLUMN_GAP * (self.columns - 1)) / self.columns
    }

    fn fill(&mut self, x: u32, width: u32, height: u32, color: Color) {
        self.nodes.push(Node::Fill {
            x,
            y: self.y,
            width,
            height,
            color,
        });
    }

    fn line_height(size: u32) -> u32 {
        size * 3 / 2
    }

    #[allow(clippy::too_many_arguments)]
    fn text_line(
        &mut self,
        text: &str,
        left: u32,
        width: u32,
        top: u32,
        size: u32,
        color: Color,
        bold: bool,
        align: Align,
    ) {
        let text_width = font::text_width(text, size).min(width);
        let x = match align {
            Align::Left => left,
            Align::Center => left + (width - text_width) / 2,
            Align::Right => left + width - text_width,
        };
        let y = top + (Self::line_height(size) - font::glyph_height(size)) / 2;
        self.nodes.push(Node::Text {
            x,
            y,
            size,
            color,
            bold,
            text: text.to_string(),
        });
    }

    fn paragraph(&mut self, text: &str, size: u32, color: Color, bold: bool, align: Align) {
        let width = self.content_width();
        for line in font::wrap(text, size, width) {
            self.text_line(&line, PADDING, width, self.y, size, color, bold, align);
            self.y += Self::line_height(size);
        }
    }

    fn grid(&mut self, summary: &RenderableSummary) {
        let mut cells: Vec<Option<Cell<'_>>> = summary
            .subject_rows
            .iter()
            .map(|row| {
                Some(Cell {
                    label: &row.label,
                    value: &row.value,
                    value_color: palette::SLATE_700,
                    band: None,
                })
            })
            .collect();

        if self.columns > 1 {
            // Spacer keeps the score rows paired side by side.
            cells.push(None);
        }

        cells.extend(summary.group_rows.iter().map(|row| {
            Some(Cell {
                label: &row.label,
                value: &row.mean_text,
                value_color: match row.group {
                    GroupKey::Movement => palette::EMERALD_600,
                    GroupKey::Outcome => palette::BLUE_600,
                },
                band: Some(format!("({})", row.band_label.to_uppercase())),
            })
        }));

        let columns = self.columns as usize;
        let column_width = self.column_width();
        for (row_index, row) in cells.chunks(columns).enumerate() {
            if row_index > 0 {
                self.y += ROW_GAP;
            }
            let top = self.y;
            let mut row_height = 0;
            for (column, cell) in row.iter().enumerate() {
                let left = PADDING + column as u32 * (column_width + COLUMN_GAP);
                if let Some(cell) = cell {
                    row_height = row_height.max(self.cell(cell, left, column_width, top));
                }
            }
            self.y = top + row_height;
        }
    }

    /// Lays out one cell and returns its height including the bottom rule.
    fn cell(&mut self, cell: &Cell<'_>, left: u32, width: u32, top: u32) -> u32 {
        let label_width = font::text_width(cell.label, SMALL_SIZE).min(width / 2);
        self.text_line(
            cell.label,
            left,
            label_width,
            top,
            SMALL_SIZE,
            palette::SLATE_500,
            false,
            Align::Left,
        );

        let band_width = cell
            .band
            .as_deref()
            .map(|band| font::text_width(band, CAPTION_SIZE) + INLINE_GAP)
            .unwrap_or(0);
        let value_width = width
            .saturating_sub(label_width + INLINE_GAP + band_width)
            .max(font::char_width(BODY_SIZE));
        let lines = font::wrap(cell.value, BODY_SIZE, value_width);
        let line_height = Self::line_height(BODY_SIZE);
        let value_right = left + width - band_width;

        for (index, line) in lines.iter().enumerate() {
            let line_top = top + index as u32 * line_height;
            let line_width = font::text_width(line, BODY_SIZE).min(value_width);
            self.text_line(
                line,
                value_right - line_width,
                line_width,
                line_top,
                BODY_SIZE,
                cell.value_color,
                true,
                Align::Right,
            );
        }

        if let Some(band) = &cell.band {
            let caption_width = band_width - INLINE_GAP;
            let caption_top = top + (line_height - Self::line_height(CAPTION_SIZE)) / 2;
            self.text_line(
                band,
                left + width - caption_width,
                caption_width,
                caption_top,
                CAPTION_SIZE,
                palette::SLATE_400,
                false,
                Align::Right,
            );
        }

        let text_height = (lines.len() as u32 * line_height).max(Self::line_height(SMALL_SIZE));
        let rule_top = top + text_height + ROW_PADDING;
        self.nodes.push(Node::Fill {
            x: left,
            y: rule_top,
            width,
            height: 1,
            color: palette::SLATE_100,
        });
        text_height + ROW_PADDING + 1
    }

    fn total_block(&mut self, summary: &RenderableSummary) {
        let top = self.y;
        let inner_width = self.content_width() - 2 * TOTAL_PADDING;
        let inner_left = PADDING + TOTAL_PADDING;
        let mut lines: Vec<(String, u32, Color, bool)> = Vec::new();

        for line in font::wrap(&summary.total.label.to_uppercase(), SMALL_SIZE, inner_width) {
            lines.push((line, SMALL_SIZE, palette::INDIGO_500, true));
        }
        lines.push((summary.total.mean_text.clone(), TOTAL_VALUE_SIZE, palette::INDIGO_700, true));
        for line in font::wrap(&summary.total.band_label, BAND_SIZE, inner_width) {
            lines.push((line, BAND_SIZE, palette::INDIGO_800, true));
        }

        let inner_height: u32 = lines.iter().map(|(_, size, _, _)| Self::line_height(*size)).sum();
        let block_height = inner_height + 2 * TOTAL_PADDING;
        let content_width = self.content_width();
        self.fill(PADDING, content_width, block_height, palette::INDIGO_50);

        let mut line_top = top + TOTAL_PADDING;
        for (text, size, color, bold) in lines {
            self.text_line(
                &text,
                inner_left,
                inner_width,
                line_top,
                size,
                color,
                bold,
                Align::Center,
            );
            line_top += Self::line_height(size);
        }
        self.y = top + block_height;
    }

    fn finish(self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.y,
            columns: self.columns,
            nodes: self.nodes,
        }
    }
}
