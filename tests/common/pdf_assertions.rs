use lopdf::content::Operation;
use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

/// Strings shown with `Tj` on every page, in drawing order.
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(content) = doc.get_page_content(page_id) else { continue };
        let Ok(content) = lopdf::content::Content::decode(&content) else { continue };
        for shown in shown_strings(&content.operations) {
            text.push_str(&shown);
            text.push('\n');
        }
    }
    text
}

/// The `Tj` operands of `ops`, decoded as Latin-1.
pub fn shown_strings(ops: &[Operation]) -> Vec<String> {
    ops.iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
            _ => None,
        })
        .collect()
}

/// Numeric operands of every `operator` in `ops`.
pub fn operands_of(ops: &[Operation], operator: &str) -> Vec<Vec<f32>> {
    ops.iter()
        .filter(|op| op.operator == operator)
        .map(|op| op.operands.iter().filter_map(|o| o.as_float().ok()).collect())
        .collect()
}

pub fn count_of(ops: &[Operation], operator: &str) -> usize {
    ops.iter().filter(|op| op.operator == operator).count()
}

/// The resource dictionary shared by the document's pages.
pub fn page_resources(doc: &LopdfDocument) -> Option<&Dictionary> {
    let (_, page_id) = doc.get_pages().into_iter().next()?;
    let page = doc.get_dictionary(page_id).ok()?;
    let resources = page.get(b"Resources").ok()?;
    match resources.as_reference() {
        Ok(id) => doc.get_dictionary(id).ok(),
        Err(_) => resources.as_dict().ok(),
    }
}

/// BaseFont names of the fonts in the page resources, sorted.
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut fonts = Vec::new();
    let Some(resources) = page_resources(doc) else { return fonts };
    let Ok(font_dict) = resources.get(b"Font").and_then(Object::as_dict) else { return fonts };
    for (_, font) in font_dict.iter() {
        let font = match font.as_reference() {
            Ok(id) => doc.get_dictionary(id).ok(),
            Err(_) => font.as_dict().ok(),
        };
        if let Some(name) = font.and_then(|f| f.get(b"BaseFont").ok()).and_then(|n| n.as_name().ok()) {
            fonts.push(String::from_utf8_lossy(name).to_string());
        }
    }
    fonts.sort();
    fonts
}

/// Image XObject streams registered in the page resources.
pub fn image_xobjects(doc: &LopdfDocument) -> Vec<&Stream> {
    let Some(resources) = page_resources(doc) else { return Vec::new() };
    let Ok(xobjects) = resources.get(b"XObject").and_then(Object::as_dict) else { return Vec::new() };
    xobjects
        .iter()
        .filter_map(|(_, obj)| obj.as_reference().ok())
        .filter_map(|id| doc.get_object(id).ok())
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| matches!(s.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Image")))
        .collect()
}

/// The `Filter` name of a stream, if it has one.
pub fn filter_name(stream: &Stream) -> Option<String> {
    stream
        .dict
        .get(b"Filter")
        .and_then(Object::as_name)
        .ok()
        .map(|n| String::from_utf8_lossy(n).to_string())
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF contains a font matching a pattern
#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should use a font matching '{}', found {:?}",
            $pattern,
            fonts
        );
    };
}

/// Assert two PDF coordinates agree to within a hundredth of a point
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr) => {
        let (actual, expected): (f32, f32) = ($actual, $expected);
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {} but got {}",
            expected,
            actual
        );
    };
}
