//! Annotation overlay for the document viewer
//!
//! Interaction state machine, hit-testing and a retained draw-command scene
//! for the layer that sits on top of a rendered PDF page.

pub mod controller;
pub mod layer;
pub mod note_dialog;
pub mod renderer;
pub mod scene;
pub mod theme;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use controller::{
    transition, Cursor, Effect, InteractionController, InteractionState, LayerContext,
    LayerEvent, Mode, ValidationError,
};
pub use hit_test::hit_test;
pub use layer::{AnnotationLayer, LayerProps, NoteDialogView};
pub use note_dialog::{NoteDraft, NoteMode};
pub use renderer::{OverlayRenderer, RenderView};
pub use scene::{Primitive, Scene};
pub use theme::OverlayTheme;
pub use tools::{shortcut, Key, KeyInput, ShortcutAction, ToolSelection};
