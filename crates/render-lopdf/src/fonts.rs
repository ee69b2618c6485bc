//! Font and style resolution onto the built-in PDF Type1 fonts.

use crate::metrics::{self, WidthTable};
use docket_document::FontFamily;
use lopdf::{Dictionary, Object, dictionary};
use std::collections::HashMap;

/// The twelve non-symbolic standard fonts every PDF reader provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl BuiltinFont {
    pub fn resolve(key: FontKey) -> Self {
        use BuiltinFont::*;
        match (key.family, key.bold, key.italic) {
            (FontFamily::Helvetica, false, false) => Helvetica,
            (FontFamily::Helvetica, true, false) => HelveticaBold,
            (FontFamily::Helvetica, false, true) => HelveticaOblique,
            (FontFamily::Helvetica, true, true) => HelveticaBoldOblique,
            (FontFamily::TimesRoman, false, false) => TimesRoman,
            (FontFamily::TimesRoman, true, false) => TimesBold,
            (FontFamily::TimesRoman, false, true) => TimesItalic,
            (FontFamily::TimesRoman, true, true) => TimesBoldItalic,
            (FontFamily::Courier, false, false) => Courier,
            (FontFamily::Courier, true, false) => CourierBold,
            (FontFamily::Courier, false, true) => CourierOblique,
            (FontFamily::Courier, true, true) => CourierBoldOblique,
        }
    }

    pub fn postscript_name(self) -> &'static str {
        use BuiltinFont::*;
        match self {
            Helvetica => "Helvetica",
            HelveticaBold => "Helvetica-Bold",
            HelveticaOblique => "Helvetica-Oblique",
            HelveticaBoldOblique => "Helvetica-BoldOblique",
            TimesRoman => "Times-Roman",
            TimesBold => "Times-Bold",
            TimesItalic => "Times-Italic",
            TimesBoldItalic => "Times-BoldItalic",
            Courier => "Courier",
            CourierBold => "Courier-Bold",
            CourierOblique => "Courier-Oblique",
            CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn widths(self) -> Option<(&'static WidthTable, u16)> {
        use BuiltinFont::*;
        match self {
            Helvetica | HelveticaOblique => Some((&metrics::HELVETICA, 556)),
            HelveticaBold | HelveticaBoldOblique => Some((&metrics::HELVETICA_BOLD, 556)),
            TimesRoman => Some((&metrics::TIMES_ROMAN, 500)),
            TimesBold => Some((&metrics::TIMES_BOLD, 500)),
            TimesItalic => Some((&metrics::TIMES_ITALIC, 500)),
            TimesBoldItalic => Some((&metrics::TIMES_BOLD_ITALIC, 500)),
            Courier | CourierBold | CourierOblique | CourierBoldOblique => None,
        }
    }

    /// Advance width of WinAnsi-encoded `text` at `size` points.
    pub fn text_width(self, text: &[u8], size: f32) -> f32 {
        let units: u32 = match self.widths() {
            Some((table, fallback)) => text
                .iter()
                .map(|&b| metrics::lookup(table, b, fallback) as u32)
                .sum(),
            None => text.len() as u32 * metrics::COURIER_WIDTH as u32,
        };
        units as f32 * size / 1000.0
    }

    fn font_dictionary(self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.postscript_name(),
            "Encoding" => "WinAnsiEncoding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: FontFamily, bold: bool, italic: bool) -> Self {
        Self { family, bold, italic }
    }

    pub fn regular(family: FontFamily) -> Self {
        Self::new(family, false, false)
    }
}

/// A resolved font: the built-in face and its page resource slot (`/F{n}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontHandle {
    pub font: BuiltinFont,
    slot: usize,
}

impl FontHandle {
    pub fn resource_name(&self) -> String {
        format!("F{}", self.slot)
    }
}

/// Per-document font cache. Each distinct `FontKey` is resolved once and keeps
/// its resource name for the rest of the render.
#[derive(Debug, Default)]
pub struct FontCache {
    handles: HashMap<FontKey, FontHandle>,
    faces: Vec<BuiltinFont>,
    resolutions: usize,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, key: FontKey) -> FontHandle {
        if let Some(handle) = self.handles.get(&key) {
            return *handle;
        }
        self.resolutions += 1;
        let font = BuiltinFont::resolve(key);
        let slot = match self.faces.iter().position(|f| *f == font) {
            Some(index) => index + 1,
            None => {
                self.faces.push(font);
                self.faces.len()
            }
        };
        let handle = FontHandle { font, slot };
        log::debug!("Resolved font {:?} to {} as /F{}", key, font.postscript_name(), slot);
        self.handles.insert(key, handle);
        handle
    }

    /// Number of cache misses so far.
    pub fn resolutions(&self) -> usize {
        self.resolutions
    }

    /// Number of distinct font faces in use.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The `/Font` resource dictionary covering every resolved face.
    pub fn font_dictionary(&self) -> Dictionary {
        let mut fonts = Dictionary::new();
        for (index, face) in self.faces.iter().enumerate() {
            fonts.set(
                format!("F{}", index + 1).into_bytes(),
                Object::Dictionary(face.font_dictionary()),
            );
        }
        fonts
    }
}
