#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The fixed page geometry every layout page is rendered onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize;

impl PageSize {
    /// A4 portrait width in points.
    pub const WIDTH: f32 = 595.28;
    /// A4 portrait height in points.
    pub const HEIGHT: f32 = 841.89;

    pub fn size() -> Size {
        Size::new(Self::WIDTH, Self::HEIGHT)
    }

    /// Convert a top-down editor Y coordinate to the bottom-up PDF coordinate.
    pub fn flip_y(y: f32) -> f32 {
        Self::HEIGHT - y
    }
}
