//! Sticky-note text entry
//!
//! Holds the draft behind the note dialog: where the note sits, the text
//! typed so far, and whether saving creates a new note or edits an existing
//! one. Also computes where the dialog should appear on the surface.

use doc_annotator_core::{Annotation, AnnotationId, DocPoint, Position, Rect, Scale, ScreenPoint};

/// Dialog width in pixels
pub const DIALOG_WIDTH: f32 = 250.0;

/// Dialog height in pixels (title, text area, buttons)
pub const DIALOG_HEIGHT: f32 = 180.0;

/// Margin kept between the dialog and the surface edge
const PADDING: f32 = 8.0;

/// Whether saving the draft creates or updates
#[derive(Debug, Clone, PartialEq)]
pub enum NoteMode {
    Create,
    Edit {
        id: AnnotationId,
        original: Option<String>,
    },
}

/// In-progress sticky note
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    /// Document-space position; width and height are the icon size
    pub position: Position,
    pub content: String,
    pub mode: NoteMode,
}

impl NoteDraft {
    /// Blank note anchored at a click point
    pub fn create(at: DocPoint, icon_size: f32) -> Self {
        Self {
            position: Rect::square_at(at, icon_size),
            content: String::new(),
            mode: NoteMode::Create,
        }
    }

    /// Draft pre-filled from an existing note
    pub fn edit(annotation: &Annotation) -> Self {
        Self {
            position: annotation.position,
            content: annotation.content.clone().unwrap_or_default(),
            mode: NoteMode::Edit {
                id: annotation.id.clone(),
                original: annotation.content.clone(),
            },
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, NoteMode::Edit { .. })
    }

    pub fn editing_id(&self) -> Option<&AnnotationId> {
        match &self.mode {
            NoteMode::Edit { id, .. } => Some(id),
            NoteMode::Create => None,
        }
    }

    /// True when an edit would not change the stored content
    pub fn is_unchanged(&self) -> bool {
        match &self.mode {
            NoteMode::Edit { original, .. } => {
                original.as_deref().unwrap_or_default() == self.content
            }
            NoteMode::Create => false,
        }
    }

    /// Top-left corner of the dialog on the surface
    ///
    /// Sits `offset` pixels right of the note icon, clamped so that the
    /// dialog stays on the surface when there is room for it.
    pub fn placement(&self, scale: Scale, offset: f32, surface: (f32, f32)) -> ScreenPoint {
        let anchor = scale.point_to_screen(self.position.origin());
        let x = (anchor.x + offset).min(surface.0 - DIALOG_WIDTH - PADDING);
        let y = anchor.y.min(surface.1 - DIALOG_HEIGHT - PADDING);
        ScreenPoint::new(x.max(PADDING), y.max(PADDING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::annotation;
    use doc_annotator_core::AnnotationKind;

    fn note(content: Option<&str>) -> Annotation {
        let position = Rect::new(40.0, 60.0, 30.0, 30.0);
        let mut note = annotation("n1", AnnotationKind::StickyNote, 1, position);
        note.content = content.map(str::to_string);
        note
    }

    #[test]
    fn test_create_uses_fixed_icon_size() {
        let draft = NoteDraft::create(DocPoint::new(50.0, 50.0), 30.0);
        assert_eq!(draft.position, Rect::new(50.0, 50.0, 30.0, 30.0));
        assert!(draft.content.is_empty());
        assert!(!draft.is_editing());
        assert!(!draft.is_unchanged());
    }

    #[test]
    fn test_edit_prefills_content() {
        let draft = NoteDraft::edit(&note(Some("remember")));
        assert_eq!(draft.content, "remember");
        assert_eq!(draft.editing_id(), Some(&AnnotationId::new("n1")));
        assert!(draft.is_unchanged());
    }

    #[test]
    fn test_edit_without_content_is_unchanged_when_empty() {
        let mut draft = NoteDraft::edit(&note(None));
        assert!(draft.is_unchanged());
        draft.content.push('x');
        assert!(!draft.is_unchanged());
    }

    #[test]
    fn test_placement_offsets_right_of_icon() {
        let draft = NoteDraft::create(DocPoint::new(50.0, 50.0), 30.0);
        let scale = Scale::new(2.0).unwrap();
        let at = draft.placement(scale, 40.0, (1224.0, 1584.0));
        assert_eq!(at, ScreenPoint::new(140.0, 100.0));
    }

    #[test]
    fn test_placement_clamps_to_surface() {
        let draft = NoteDraft::create(DocPoint::new(600.0, 780.0), 30.0);
        let at = draft.placement(Scale::IDENTITY, 40.0, (612.0, 792.0));
        assert_eq!(at.x, 612.0 - DIALOG_WIDTH - 8.0);
        assert_eq!(at.y, 792.0 - DIALOG_HEIGHT - 8.0);
    }
}
