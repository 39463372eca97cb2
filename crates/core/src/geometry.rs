//! Coordinate spaces and zoom scaling
//!
//! Annotations are stored in document space: the page's native, unscaled
//! units. The overlay draws and hit-tests in screen space, which is document
//! space multiplied by the current zoom [`Scale`]. Conversions are plain
//! multiplications and divisions with no rounding, so a rectangle drawn at a
//! given zoom is hit-tested against exactly the same box.

use serde::{Deserialize, Serialize};

/// Errors raised when building geometry from untrusted input
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("scale must be a finite number greater than zero, got {0}")]
    InvalidScale(f32),
}

/// A point in document space (unscaled page units)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f32,
    pub y: f32,
}

impl DocPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in screen space (pixels on the overlay surface, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle
///
/// Used in both coordinate spaces; which one is meant follows from where the
/// value came from (`Position` on a record is always document space).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Document-space rectangle stored on an annotation record
pub type Position = Rect;

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two corners, with non-negative width and height
    /// whichever direction the drag went.
    pub fn normalized(anchor: DocPoint, current: DocPoint) -> Self {
        Self {
            x: anchor.x.min(current.x),
            y: anchor.y.min(current.y),
            width: (current.x - anchor.x).abs(),
            height: (current.y - anchor.y).abs(),
        }
    }

    /// Square of `size` with its top-left corner at `origin`
    pub fn square_at(origin: DocPoint, size: f32) -> Self {
        Self::new(origin.x, origin.y, size, size)
    }

    /// Edge-inclusive containment test
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// True when both dimensions are strictly greater than `min`
    pub fn exceeds(&self, min: f32) -> bool {
        self.width > min && self.height > min
    }

    /// Grow the rectangle by `amount` on every side
    pub fn outset(&self, amount: f32) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }

    pub fn origin(&self) -> DocPoint {
        DocPoint::new(self.x, self.y)
    }
}

/// Zoom factor between document space and screen space
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Scale(f32);

impl Scale {
    /// 100% zoom
    pub const IDENTITY: Scale = Scale(1.0);

    pub fn new(factor: f32) -> Result<Self, GeometryError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(GeometryError::InvalidScale(factor))
        }
    }

    pub fn factor(&self) -> f32 {
        self.0
    }

    /// Document-space rectangle to screen space
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        Rect {
            x: rect.x * self.0,
            y: rect.y * self.0,
            width: rect.width * self.0,
            height: rect.height * self.0,
        }
    }

    /// Screen-space rectangle back to document space
    pub fn rect_to_document(&self, rect: &Rect) -> Rect {
        Rect {
            x: rect.x / self.0,
            y: rect.y / self.0,
            width: rect.width / self.0,
            height: rect.height / self.0,
        }
    }

    /// Pointer position on the surface to document space
    pub fn point_to_document(&self, point: ScreenPoint) -> DocPoint {
        DocPoint::new(point.x / self.0, point.y / self.0)
    }

    pub fn point_to_screen(&self, point: DocPoint) -> ScreenPoint {
        ScreenPoint::new(point.x * self.0, point.y * self.0)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<f32> for Scale {
    type Error = GeometryError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Scale::new(value)
    }
}

impl From<Scale> for f32 {
    fn from(scale: Scale) -> Self {
        scale.0
    }
}

/// Pixel size of the overlay surface for a page at the given zoom
pub fn page_surface_size(page_width: f32, page_height: f32, scale: Scale) -> (f32, f32) {
    (page_width * scale.factor(), page_height * scale.factor())
}
