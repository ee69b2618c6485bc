use std::fmt;

/// An element left out of the output, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedElement {
    /// Zero-based page index.
    pub page: usize,
    pub element_id: String,
    pub kind: &'static str,
    pub reason: String,
}

/// What a render produced. A render with skipped elements still yields a
/// usable document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub pages: usize,
    pub elements_drawn: usize,
    pub skipped: Vec<SkippedElement>,
    pub fonts_used: usize,
    pub images_embedded: usize,
}

impl RenderReport {
    pub fn is_degraded(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub(crate) fn skip(&mut self, page: usize, element_id: &str, kind: &'static str, reason: impl fmt::Display) {
        let reason = reason.to_string();
        log::warn!("Skipping {} element '{}' on page {}: {}", kind, element_id, page + 1, reason);
        self.skipped.push(SkippedElement {
            page,
            element_id: element_id.to_string(),
            kind,
            reason,
        });
    }
}
