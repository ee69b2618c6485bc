use crate::error::RenderError;
use crate::fonts::FontCache;
use crate::page::PageContext;
use crate::report::RenderReport;
use crate::writer::StreamingPdfWriter;
use docket_document::LayoutDocument;
use docket_template::RecordData;
use docket_types::{PageSize, Size};
use lopdf::{Object, dictionary};
use std::io::{Cursor, Seek, Write};

/// How a page's image elements are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageDecoding {
    /// Decode each image when it is drawn.
    #[default]
    Sequential,
    /// Decode all of a page's images on the rayon pool before drawing it.
    /// Requires the `parallel-images` feature; otherwise behaves like
    /// `Sequential`.
    Parallel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub pdf_version: String,
    /// Written to the document information dictionary when set.
    pub producer: Option<String>,
    pub page_size: Size,
    pub image_decoding: ImageDecoding,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pdf_version: "1.7".to_string(),
            producer: Some(concat!("docket ", env!("CARGO_PKG_VERSION")).to_string()),
            page_size: PageSize::size(),
            image_decoding: ImageDecoding::default(),
        }
    }
}

/// Turns a layout plus one record into a PDF, one output page per layout page.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    options: RenderOptions,
}

impl DocumentAssembler {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(
        &self,
        layout: &LayoutDocument,
        record: &RecordData,
    ) -> Result<(Vec<u8>, RenderReport), RenderError> {
        let (cursor, report) = self.render_to_writer(layout, record, Cursor::new(Vec::new()))?;
        Ok((cursor.into_inner(), report))
    }

    pub fn render_to_writer<W: Write + Seek>(
        &self,
        layout: &LayoutDocument,
        record: &RecordData,
        writer: W,
    ) -> Result<(W, RenderReport), RenderError> {
        layout.validate()?;

        let Size { width: page_width, height: page_height } = self.options.page_size;
        let mut writer = StreamingPdfWriter::new(writer, &self.options.pdf_version)?;
        if let Some(producer) = &self.options.producer {
            writer.set_producer(producer.as_str());
        }
        let mut fonts = FontCache::new();
        let mut report = RenderReport::default();
        let parallel_images = self.options.image_decoding == ImageDecoding::Parallel;
        if parallel_images && !cfg!(feature = "parallel-images") {
            log::warn!("Parallel image decoding requested but the 'parallel-images' feature is disabled");
        }

        for (index, page) in layout.pages.iter().enumerate() {
            log::debug!("Rendering page {} ({} elements)", index + 1, page.elements.len());
            let content = PageContext::new(index, page_height, &mut fonts, &mut writer, record, &mut report)
                .with_parallel_images(parallel_images)
                .draw_elements(&page.elements)?;
            let content_id = writer.write_content_stream(content)?;

            let page_id = writer.new_object_id();
            let page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => writer.pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
                "Contents" => content_id,
                "Resources" => writer.resources_id,
            };
            writer.buffer_object_at_id(page_id, Object::Dictionary(page_dict));
            writer.add_page(page_id);
            report.pages += 1;
        }

        report.fonts_used = fonts.len();
        let output = writer.finish(fonts.font_dictionary())?;
        log::info!(
            "Rendered {} page(s), {} element(s) drawn, {} skipped",
            report.pages,
            report.elements_drawn,
            report.skipped.len()
        );
        Ok((output, report))
    }
}
