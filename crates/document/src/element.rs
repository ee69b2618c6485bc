//! The closed set of drawable elements a layout page can hold.

use crate::de::{lenient_int, null_as_default, string_or_number};
use docket_types::Rect;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_CELL_WIDTH: f32 = 100.0;
pub const DEFAULT_CELL_HEIGHT: f32 = 30.0;

/// One drawable unit on a page, discriminated by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
    Table(TableElement),
}

impl Element {
    pub fn common(&self) -> &ElementCommon {
        match self {
            Element::Text(t) => &t.common,
            Element::Image(i) => &i.common,
            Element::Table(t) => &t.common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Image(_) => "image",
            Element::Table(_) => "table",
        }
    }
}

/// Fields shared by every element. `x`/`y` are the top-left corner in page
/// points with Y growing downward.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementCommon {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f32,
    /// Editor-only state. Read so that stored layouts round-trip, never written.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing)]
    pub draggable: bool,
}

/// The three built-in font families a layout may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    #[default]
    Helvetica,
    TimesRoman,
    Courier,
}

impl FontFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesRoman => "Times-Roman",
            FontFamily::Courier => "Courier",
        }
    }

    /// Unrecognized names resolve to Helvetica.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "times-roman" => FontFamily::TimesRoman,
            "courier" => FontFamily::Courier,
            "helvetica" => FontFamily::Helvetica,
            other => {
                log::debug!("Unknown font family '{}', using Helvetica", other);
                FontFamily::Helvetica
            }
        }
    }
}

impl From<String> for FontFamily {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<FontFamily> for String {
    fn from(family: FontFamily) -> Self {
        family.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl From<String> for TextAlign {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }
}

impl From<TextAlign> for String {
    fn from(align: TextAlign) -> Self {
        match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    /// Raw text, may contain `{{field}}` placeholders.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bold: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub italic: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub align: TextAlign,
}

impl TextElement {
    pub fn family(&self) -> FontFamily {
        self.font_family.unwrap_or_default()
    }

    pub fn font_size(&self) -> f32 {
        positive_or(self.font_size, DEFAULT_FONT_SIZE)
    }
}

/// A source-pixel crop window. Fields left out of the layout default to the
/// full source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    /// Clamps the window into `[0, width] x [0, height]`. Never fails; a
    /// window entirely outside the bounds collapses to zero area.
    pub fn clamp_to(self, bound_width: f32, bound_height: f32) -> CropRect {
        let bound_width = bound_width.max(0.0);
        let bound_height = bound_height.max(0.0);
        let x = self.x.max(0.0).min(bound_width);
        let y = self.y.max(0.0).min(bound_height);
        CropRect {
            x,
            y,
            width: self.width.max(0.0).min(bound_width - x),
            height: self.height.max(0.0).min(bound_height - y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_rect().is_empty()
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    /// A `data:image/png;base64,...` or `data:image/jpeg;base64,...` URI.
    #[serde(default, deserialize_with = "null_as_default")]
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f32>,
}

impl ImageElement {
    pub fn has_crop(&self) -> bool {
        self.crop_x.is_some()
            || self.crop_y.is_some()
            || self.crop_width.is_some()
            || self.crop_height.is_some()
    }

    /// The crop window clamped to the source bounds. The bounds are the
    /// declared original dimensions, further limited by what was actually
    /// decoded. Returns `None` when the layout asks for the full source.
    pub fn crop_within(&self, source_width: u32, source_height: u32) -> Option<CropRect> {
        if !self.has_crop() {
            return None;
        }
        let bound_width = positive(self.original_width)
            .map_or(source_width as f32, |w| w.min(source_width as f32));
        let bound_height = positive(self.original_height)
            .map_or(source_height as f32, |h| h.min(source_height as f32));
        let requested = CropRect {
            x: self.crop_x.unwrap_or(0.0),
            y: self.crop_y.unwrap_or(0.0),
            width: self.crop_width.unwrap_or(f32::INFINITY),
            height: self.crop_height.unwrap_or(f32::INFINITY),
        };
        Some(requested.clamp_to(bound_width, bound_height))
    }

    /// The render box. Missing or non-positive sizes fall back to the declared
    /// original dimensions, then to `fallback` (the drawn pixel size).
    pub fn render_size(&self, fallback: (f32, f32)) -> (f32, f32) {
        let width = positive(self.width)
            .or(positive(self.original_width))
            .unwrap_or(fallback.0);
        let height = positive(self.height)
            .or(positive(self.original_height))
            .unwrap_or(fallback.1);
        (width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default, deserialize_with = "lenient_int")]
    pub row: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub col: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    #[serde(default, deserialize_with = "lenient_int")]
    pub rows: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub cols: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cells: Vec<TableCell>,
}

/// Largest row or column count a table may declare.
pub const MAX_TABLE_TRACKS: usize = 1000;

/// Effective table geometry after clamping and resize handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableGrid {
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl TableElement {
    pub fn family(&self) -> FontFamily {
        self.font_family.unwrap_or_default()
    }

    pub fn font_size(&self) -> f32 {
        positive_or(self.font_size, DEFAULT_FONT_SIZE)
    }

    /// Whether `rows` or `cols` is larger than [`MAX_TABLE_TRACKS`].
    pub fn exceeds_track_limit(&self) -> bool {
        [self.rows, self.cols]
            .into_iter()
            .flatten()
            .any(|n| n > MAX_TABLE_TRACKS as i64)
    }

    /// Rows and columns are clamped to at least one. An explicit box size wins
    /// over `rows x cellHeight`, so a resized table divides its box evenly.
    pub fn grid(&self) -> TableGrid {
        let rows = clamp_count(self.rows);
        let cols = clamp_count(self.cols);
        let width = positive(self.width)
            .unwrap_or_else(|| cols as f32 * positive_or(self.cell_width, DEFAULT_CELL_WIDTH));
        let height = positive(self.height)
            .unwrap_or_else(|| rows as f32 * positive_or(self.cell_height, DEFAULT_CELL_HEIGHT));
        TableGrid {
            rows,
            cols,
            width,
            height,
            cell_width: width / cols as f32,
            cell_height: height / rows as f32,
        }
    }
}

fn clamp_count(value: Option<i64>) -> usize {
    match value {
        Some(n) if n >= 1 => n as usize,
        _ => 1,
    }
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn positive_or(value: Option<f32>, default: f32) -> f32 {
    positive(value).unwrap_or(default)
}
