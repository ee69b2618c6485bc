use crate::de::{lenient_elements, lenient_elements_opt};
use crate::element::Element;
use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single page of positioned elements, drawn in list order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_elements")]
    pub elements: Vec<Element>,
}

/// A parsed layout: an ordered list of pages.
///
/// Stored layouts come in two shapes. The multi-page form carries a `pages`
/// array; the legacy form carries a top-level `elements` array that reads as
/// a single page. Both normalize to the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub pages: Vec<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayout {
    #[serde(default)]
    pages: Option<Vec<Page>>,
    #[serde(default, deserialize_with = "lenient_elements_opt")]
    elements: Option<Vec<Element>>,
    #[serde(default)]
    canvas_width: Option<f32>,
    #[serde(default)]
    canvas_height: Option<f32>,
}

impl LayoutDocument {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages, canvas_width: None, canvas_height: None }
    }

    /// A single-page document, the shape legacy layouts normalize to.
    pub fn single_page(elements: Vec<Element>) -> Self {
        Self::new(vec![Page { id: None, elements }])
    }

    pub fn from_json_str(input: &str) -> Result<Self, LayoutError> {
        if input.trim().is_empty() {
            return Err(LayoutError::Missing);
        }
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, LayoutError> {
        match &value {
            Value::Null => return Err(LayoutError::Missing),
            Value::Object(_) => {}
            other => {
                return Err(LayoutError::Malformed(format!(
                    "expected an object, found {}",
                    json_kind(other)
                )));
            }
        }

        let raw: RawLayout = serde_json::from_value(value)?;
        let pages = match (raw.pages, raw.elements) {
            (Some(pages), _) => pages,
            (None, Some(elements)) => {
                log::debug!("Reading legacy single-page layout with {} elements", elements.len());
                vec![Page { id: None, elements }]
            }
            (None, None) => Vec::new(),
        };

        let document = Self {
            pages,
            canvas_width: raw.canvas_width,
            canvas_height: raw.canvas_height,
        };
        document.validate()?;
        Ok(document)
    }

    /// A document must contain at least one page to be renderable.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.pages.is_empty() {
            return Err(LayoutError::NoPages);
        }
        Ok(())
    }

    /// The stored form of this layout. Editor-only state such as `draggable`
    /// is dropped.
    pub fn to_json_value(&self) -> Result<Value, LayoutError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|p| p.elements.len()).sum()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
