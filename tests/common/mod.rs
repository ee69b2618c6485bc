pub mod fixtures;
pub mod pdf_assertions;

use docket::{DocumentAssembler, LayoutDocument, RecordData, RenderReport};
use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};
use lopdf::ObjectId;
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Object id of the 1-based page `number`.
    pub fn page_id(&self, number: u32) -> Result<ObjectId, Box<dyn std::error::Error>> {
        self.doc
            .get_pages()
            .get(&number)
            .copied()
            .ok_or_else(|| format!("no page {}", number).into())
    }

    /// Decoded content stream operations of the 1-based page `number`.
    pub fn operations(&self, number: u32) -> Result<Vec<Operation>, Box<dyn std::error::Error>> {
        let content = self.doc.get_page_content(self.page_id(number)?)?;
        Ok(Content::decode(&content)?.operations)
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Renders a layout given as JSON with the default options.
pub fn render_json(layout: &Value, record: &RecordData) -> Result<(GeneratedPdf, RenderReport), Box<dyn std::error::Error>> {
    let layout = LayoutDocument::from_json_value(layout.clone())?;
    render_layout(&layout, record)
}

pub fn render_layout(
    layout: &LayoutDocument,
    record: &RecordData,
) -> Result<(GeneratedPdf, RenderReport), Box<dyn std::error::Error>> {
    let (bytes, report) = DocumentAssembler::default().render(layout, record)?;
    Ok((GeneratedPdf::from_bytes(bytes)?, report))
}

/// A record with a title, a description and a couple of custom fields.
pub fn sample_record() -> RecordData {
    RecordData::new("Pump service", "Replace worn seals")
        .with_field("customer", "ACME")
        .with_field("site", "Dock 4")
}
