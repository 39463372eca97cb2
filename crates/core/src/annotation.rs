//! Annotation data model
//!
//! Records are owned by the remote annotation service; this crate only mirrors
//! them. Positions are stored in document space (see [`crate::geometry`]).
//! Paint order and hit order are list order: there is no z-index field.

use crate::geometry::{Position, Rect, Scale};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge length of a sticky-note icon, in pixels
pub const STICKY_NOTE_SIZE: f32 = 30.0;

/// Identifier assigned by the annotation service on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the document an annotation belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Annotation variants
///
/// Each variant carries its own paint and hit-test rules; sticky notes are a
/// fixed-size icon, everything else is a scaled rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationKind {
    Highlight,
    StickyNote,
    Redaction,
    Comment,
}

impl AnnotationKind {
    /// Wire name (`HIGHLIGHT`, `STICKY_NOTE`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Highlight => "HIGHLIGHT",
            AnnotationKind::StickyNote => "STICKY_NOTE",
            AnnotationKind::Redaction => "REDACTION",
            AnnotationKind::Comment => "COMMENT",
        }
    }

    /// Whether this tool creates annotations by dragging a rectangle
    pub fn is_drag_tool(&self) -> bool {
        !matches!(self, AnnotationKind::StickyNote)
    }

    /// Screen-space box used for both painting and hit-testing
    ///
    /// Sticky notes ignore the stored width/height and occupy a fixed
    /// `note_size` square anchored at the scaled position.
    pub fn screen_box(&self, position: &Position, scale: Scale, note_size: f32) -> Rect {
        match self {
            AnnotationKind::StickyNote => Rect::new(
                position.x * scale.factor(),
                position.y * scale.factor(),
                note_size,
                note_size,
            ),
            AnnotationKind::Highlight | AnnotationKind::Redaction | AnnotationKind::Comment => {
                scale.rect_to_screen(position)
            }
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnnotationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "HIGHLIGHT" => Ok(AnnotationKind::Highlight),
            "STICKY_NOTE" | "NOTE" => Ok(AnnotationKind::StickyNote),
            "REDACTION" => Ok(AnnotationKind::Redaction),
            "COMMENT" => Ok(AnnotationKind::Comment),
            other => Err(format!("unknown annotation type '{other}'")),
        }
    }
}

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`, alpha is dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to normalized RGBA values (0.0 to 1.0)
    pub fn to_normalized(&self) -> (f32, f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
}

/// Fixed annotation palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Yellow,
    Green,
    Blue,
    Red,
    Purple,
    Orange,
    Black,
}

impl PaletteColor {
    /// Colors offered by the color picker (black is reserved for redactions)
    pub const SELECTABLE: [PaletteColor; 6] = [
        PaletteColor::Yellow,
        PaletteColor::Green,
        PaletteColor::Blue,
        PaletteColor::Red,
        PaletteColor::Purple,
        PaletteColor::Orange,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            PaletteColor::Yellow => "#FFEB3B",
            PaletteColor::Green => "#4CAF50",
            PaletteColor::Blue => "#2196F3",
            PaletteColor::Red => "#F44336",
            PaletteColor::Purple => "#9C27B0",
            PaletteColor::Orange => "#FF9800",
            PaletteColor::Black => "#000000",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaletteColor::Yellow => "yellow",
            PaletteColor::Green => "green",
            PaletteColor::Blue => "blue",
            PaletteColor::Red => "red",
            PaletteColor::Purple => "purple",
            PaletteColor::Orange => "orange",
            PaletteColor::Black => "black",
        }
    }

    pub fn color(&self) -> Color {
        // Palette hex strings are compile-time constants and always parse.
        Color::from_hex(self.hex()).unwrap_or(Color::BLACK)
    }

    /// Look up a palette entry by hex value (case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Self> {
        [
            PaletteColor::Yellow,
            PaletteColor::Green,
            PaletteColor::Blue,
            PaletteColor::Red,
            PaletteColor::Purple,
            PaletteColor::Orange,
            PaletteColor::Black,
        ]
        .into_iter()
        .find(|p| p.hex().eq_ignore_ascii_case(hex.trim()))
    }
}

impl Default for PaletteColor {
    fn default() -> Self {
        PaletteColor::Yellow
    }
}

/// A persisted annotation as returned by the annotation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub document_id: DocumentId,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// 1-based page number
    pub page_number: u32,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Annotation {
    /// Screen-space box at the given zoom (see [`AnnotationKind::screen_box`])
    pub fn screen_box(&self, scale: Scale, note_size: f32) -> Rect {
        self.kind.screen_box(&self.position, scale, note_size)
    }

    /// Stored color parsed for painting; unknown values fall back to yellow
    pub fn paint_color(&self) -> Color {
        Color::from_hex(&self.color).unwrap_or_else(|| PaletteColor::Yellow.color())
    }

    /// Merge an update response into this record
    ///
    /// Fields absent from the patch keep their current value.
    pub fn apply(&mut self, patch: &AnnotationPatch) {
        if let Some(content) = &patch.content {
            self.content = Some(content.clone());
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
    }
}

/// Create payload: an annotation without server-assigned fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationInput {
    pub document_id: DocumentId,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub page_number: u32,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Partial update, used both as the request body and the service's response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AnnotationPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.position.is_none()
            && self.color.is_none()
            && self.updated_at.is_none()
    }
}

/// Per-kind annotation counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationStats {
    pub total: usize,
    pub highlights: usize,
    pub sticky_notes: usize,
    pub redactions: usize,
    pub comments: usize,
}

/// Ordered annotation list for one document
///
/// Order is significant: later entries paint over earlier ones and win
/// hit-tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationCollection {
    annotations: Vec<Annotation>,
}

impl AnnotationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    /// Replace the whole list (full refresh, last write wins)
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    /// Append a newly created annotation on top of the stack
    pub fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Merge a patch into the matching record, returning the merged copy
    pub fn merge(&mut self, id: &AnnotationId, patch: &AnnotationPatch) -> Option<Annotation> {
        let annotation = self.annotations.iter_mut().find(|a| &a.id == id)?;
        annotation.apply(patch);
        Some(annotation.clone())
    }

    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| &a.id == id)?;
        Some(self.annotations.remove(index))
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Annotations on a 1-based page, in list order
    pub fn for_page(&self, page_number: u32) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.page_number == page_number)
            .collect()
    }

    pub fn all(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn to_vec(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn stats(&self) -> AnnotationStats {
        let mut stats = AnnotationStats {
            total: self.annotations.len(),
            ..Default::default()
        };
        for annotation in &self.annotations {
            match annotation.kind {
                AnnotationKind::Highlight => stats.highlights += 1,
                AnnotationKind::StickyNote => stats.sticky_notes += 1,
                AnnotationKind::Redaction => stats.redactions += 1,
                AnnotationKind::Comment => stats.comments += 1,
            }
        }
        stats
    }
}
