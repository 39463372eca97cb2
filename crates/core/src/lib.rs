//! Document Annotator Core Library
//!
//! Annotation records, coordinate scaling and overlay settings shared by the
//! interaction layer and the store client.

pub mod annotation;
pub mod config;
pub mod geometry;

pub use annotation::{
    Annotation, AnnotationCollection, AnnotationId, AnnotationInput, AnnotationKind,
    AnnotationPatch, AnnotationStats, Color, DocumentId, PaletteColor, STICKY_NOTE_SIZE,
};
pub use config::{ConfigError, HoverOpacity, LayerConfig};
pub use geometry::{page_surface_size, DocPoint, GeometryError, Position, Rect, Scale, ScreenPoint};
