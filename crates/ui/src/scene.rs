//! Draw-command scene for the annotation overlay
//!
//! A [`Scene`] is an ordered list of primitives produced by a full render of
//! the overlay. Hosts replay it onto whatever 2D surface they own; the first
//! primitive always clears the whole surface, so a scene never depends on
//! what was drawn before it.

use doc_annotator_core::Rect;
use serde::Serialize;

/// RGBA color value (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA values (0.0 to 1.0)
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque color from RGB values
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert a palette color, replacing its alpha with `opacity`
    pub fn from_palette(color: doc_annotator_core::Color, opacity: f32) -> Self {
        let (r, g, b, _) = color.to_normalized();
        Self { r, g, b, a: opacity }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Visual primitive types that can be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Primitive {
    /// Clear the whole surface to transparent
    Clear { width: f32, height: f32 },
    /// Filled rectangle with solid color
    FillRect { rect: Rect, color: Color },
    /// Rectangle outline, optionally dashed (on, off lengths)
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        dash: Option<[f32; 2]>,
    },
}

impl Primitive {
    pub fn rect(&self) -> Option<&Rect> {
        match self {
            Primitive::Clear { .. } => None,
            Primitive::FillRect { rect, .. } | Primitive::StrokeRect { rect, .. } => Some(rect),
        }
    }
}

/// One full frame of the overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    width: f32,
    height: f32,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Start a frame for a surface of the given pixel size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            primitives: vec![Primitive::Clear { width, height }],
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(Primitive::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.push(Primitive::StrokeRect {
            rect,
            color,
            width,
            dash: None,
        });
    }

    pub fn dashed_rect(&mut self, rect: Rect, color: Color, width: f32, dash: [f32; 2]) {
        self.push(Primitive::StrokeRect {
            rect,
            color,
            width,
            dash: Some(dash),
        });
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_starts_with_clear() {
        let scene = Scene::new(612.0, 792.0);
        assert_eq!(scene.len(), 1);
        assert_eq!(
            scene.primitives()[0],
            Primitive::Clear {
                width: 612.0,
                height: 792.0
            }
        );
        assert_eq!(scene.primitives()[0].rect(), None);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::rgb(1.0, 0.0, 0.0));
        scene.stroke_rect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::rgb(0.0, 0.0, 1.0), 2.0);
        assert_eq!(scene.len(), 3);
        assert!(matches!(scene.primitives()[1], Primitive::FillRect { .. }));
        assert!(matches!(scene.primitives()[2], Primitive::StrokeRect { dash: None, .. }));
    }

    #[test]
    fn test_from_palette_replaces_alpha() {
        let color = Color::from_palette(doc_annotator_core::Color::new(255, 0, 0, 10), 0.3);
        assert_eq!(color, Color::rgba(1.0, 0.0, 0.0, 0.3));
    }

    #[test]
    fn test_primitive_json_tag() {
        let mut scene = Scene::new(10.0, 10.0);
        let black = Color::rgb(0.0, 0.0, 0.0);
        scene.dashed_rect(Rect::new(1.0, 1.0, 2.0, 2.0), black, 2.0, [5.0, 5.0]);
        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["primitives"][0]["op"], "clear");
        assert_eq!(value["primitives"][1]["op"], "stroke_rect");
        assert_eq!(value["primitives"][1]["dash"][0], 5.0);
    }
}
