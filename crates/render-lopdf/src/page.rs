//! Draws one layout page onto one content stream.

use crate::error::{ElementError, RenderError};
use crate::fonts::{FontCache, FontHandle, FontKey};
use crate::images::PreparedImage;
use crate::report::RenderReport;
use crate::writer::StreamingPdfWriter;
use docket_document::{
    Element, ImageElement, MAX_TABLE_TRACKS, TableElement, TextAlign, TextElement,
};
use docket_template::RecordData;
use docket_types::Color;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::HashMap;
use std::io::{Seek, Write};

/// Horizontal inset of table cell text from the cell's left border.
const CELL_TEXT_INSET: f32 = 4.0;
/// Distance of the underline below the text baseline.
const UNDERLINE_OFFSET: f32 = 2.0;

type Decoded = HashMap<usize, Result<PreparedImage, ElementError>>;

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font_name: String,
    font_size: f32,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

pub struct PageContext<'a, W: Write + Seek> {
    page_index: usize,
    page_height: f32,
    content: Content,
    state: PageRenderState,
    fonts: &'a mut FontCache,
    writer: &'a mut StreamingPdfWriter<W>,
    record: &'a RecordData,
    report: &'a mut RenderReport,
    parallel_images: bool,
}

impl<'a, W: Write + Seek> PageContext<'a, W> {
    pub fn new(
        page_index: usize,
        page_height: f32,
        fonts: &'a mut FontCache,
        writer: &'a mut StreamingPdfWriter<W>,
        record: &'a RecordData,
        report: &'a mut RenderReport,
    ) -> Self {
        Self {
            page_index,
            page_height,
            content: Content { operations: vec![] },
            state: Default::default(),
            fonts,
            writer,
            record,
            report,
            parallel_images: false,
        }
    }

    /// Decode this page's images on the rayon pool before drawing. Has no
    /// effect unless the `parallel-images` feature is enabled.
    pub fn with_parallel_images(mut self, enabled: bool) -> Self {
        self.parallel_images = enabled;
        self
    }

    /// Draws `elements` in order. Element failures are recorded in the report
    /// and skipped; only output errors abort the page.
    pub fn draw_elements(mut self, elements: &[Element]) -> Result<Content, RenderError> {
        let mut decoded = if self.parallel_images { predecode(elements) } else { Decoded::new() };
        for (index, element) in elements.iter().enumerate() {
            match element {
                Element::Text(text) => self.draw_text(text),
                Element::Image(image) => {
                    let prepared = decoded
                        .remove(&index)
                        .unwrap_or_else(|| PreparedImage::prepare(image));
                    self.draw_image(image, prepared)?;
                }
                Element::Table(table) => self.draw_table(table),
            }
        }
        Ok(self.content)
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_font(&mut self, handle: FontHandle, size: f32) {
        let name = handle.resource_name();
        if self.state.font_name != name || self.state.font_size != size {
            self.push("Tf", vec![Object::Name(name.as_bytes().to_vec()), size.into()]);
            self.state.font_name = name;
            self.state.font_size = size;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let [r, g, b] = color.to_rgb_f32();
            self.push("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color != Some(color) {
            let [r, g, b] = color.to_rgb_f32();
            self.push("RG", vec![r.into(), g.into(), b.into()]);
            self.state.stroke_color = Some(color);
        }
    }

    fn set_line_width(&mut self, width: f32) {
        if self.state.line_width != Some(width) {
            self.push("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    fn show_text(&mut self, handle: FontHandle, size: f32, color: Color, x: f32, baseline: f32, encoded: Vec<u8>) {
        self.push("BT", vec![]);
        self.set_font(handle, size);
        self.set_fill_color(color);
        self.push("Td", vec![x.into(), baseline.into()]);
        self.push("Tj", vec![Object::String(encoded, StringFormat::Literal)]);
        self.push("ET", vec![]);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.push("m", vec![from.0.into(), from.1.into()]);
        self.push("l", vec![to.0.into(), to.1.into()]);
    }

    fn draw_text(&mut self, text: &TextElement) {
        let resolved = docket_template::resolve(&text.text, self.record);
        if resolved.is_empty() {
            log::debug!("Text element '{}' resolved to nothing", text.common.id);
            return;
        }
        let handle = self.fonts.resolve(FontKey::new(text.family(), text.bold, text.italic));
        let size = text.font_size();
        let encoded = to_win_ansi(&resolved);
        let width = handle.font.text_width(&encoded, size);
        let x = match text.align {
            TextAlign::Left => text.common.x,
            TextAlign::Center => text.common.x - width / 2.0,
            TextAlign::Right => text.common.x - width,
        };
        let baseline = self.page_height - text.common.y - size;
        let color = Color::from_hex_or_black(text.color.as_deref());

        self.show_text(handle, size, color, x, baseline, encoded);
        if text.underline {
            self.set_stroke_color(color);
            self.set_line_width(1.0);
            let y = baseline - UNDERLINE_OFFSET;
            self.line((x, y), (x + width, y));
            self.push("S", vec![]);
        }
        self.report.elements_drawn += 1;
    }

    fn draw_image(
        &mut self,
        image: &ImageElement,
        prepared: Result<PreparedImage, ElementError>,
    ) -> Result<(), RenderError> {
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.report.skip(self.page_index, &image.common.id, "image", e);
                return Ok(());
            }
        };
        let (width, height) = (prepared.render_width, prepared.render_height);
        let x = image.common.x;
        let y = self.page_height - image.common.y - height;
        let name = prepared.embed(self.writer)?;

        self.push("q", vec![]);
        self.push("cm", vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()]);
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
        self.report.images_embedded += 1;
        self.report.elements_drawn += 1;
        Ok(())
    }

    fn draw_table(&mut self, table: &TableElement) {
        if table.exceeds_track_limit() {
            self.report.skip(
                self.page_index,
                &table.common.id,
                "table",
                format!("more than {} rows or columns", MAX_TABLE_TRACKS),
            );
            return;
        }
        let grid = table.grid();
        let left = table.common.x;
        let top = self.page_height - table.common.y;

        self.set_stroke_color(Color::from_hex_or_black(table.border_color.as_deref()));
        self.set_line_width(1.0);
        for row in 0..=grid.rows {
            let y = top - row as f32 * grid.cell_height;
            self.line((left, y), (left + grid.width, y));
        }
        for col in 0..=grid.cols {
            let x = left + col as f32 * grid.cell_width;
            self.line((x, top), (x, top - grid.height));
        }
        self.push("S", vec![]);

        let size = table.font_size();
        for cell in &table.cells {
            let (Some(row), Some(col)) = (cell.row, cell.col) else {
                log::warn!("Table '{}' has a cell without row/col, ignoring it", table.common.id);
                continue;
            };
            if row < 0 || col < 0 || row as usize >= grid.rows || col as usize >= grid.cols {
                log::warn!(
                    "Table '{}' cell ({}, {}) lies outside its {}x{} grid",
                    table.common.id, row, col, grid.rows, grid.cols
                );
                continue;
            }
            let resolved = docket_template::resolve(&cell.text, self.record);
            if resolved.is_empty() {
                continue;
            }
            let handle = self.fonts.resolve(FontKey::regular(table.family()));
            let x = left + col as f32 * grid.cell_width + CELL_TEXT_INSET;
            let center = top - row as f32 * grid.cell_height - grid.cell_height / 2.0;
            self.show_text(handle, size, Color::BLACK, x, center - size / 3.0, to_win_ansi(&resolved));
        }
        self.report.elements_drawn += 1;
    }
}

#[cfg(feature = "parallel-images")]
fn predecode(elements: &[Element]) -> Decoded {
    use rayon::prelude::*;
    elements
        .par_iter()
        .enumerate()
        .filter_map(|(index, element)| match element {
            Element::Image(image) => Some((index, PreparedImage::prepare(image))),
            _ => None,
        })
        .collect()
}

#[cfg(not(feature = "parallel-images"))]
fn predecode(_elements: &[Element]) -> Decoded {
    Decoded::new()
}

/// Encodes text for the WinAnsiEncoding built-in fonts. Characters the
/// encoding cannot represent become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}
