pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{PageSize, Rect, Size};
pub use ids::{LayoutId, RecordId};
