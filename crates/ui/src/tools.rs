//! Tool and color selection
//!
//! The active tool and color are owned by the surrounding viewer; the overlay
//! only reads them. This module holds the selection value itself plus the
//! keyboard shortcuts that request a change of tool.

use doc_annotator_core::{AnnotationKind, PaletteColor};

/// Active tool and color, as chosen in the tool panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSelection {
    /// `None` is select mode: no creation, hit-testing and selection only
    pub tool: Option<AnnotationKind>,
    /// Hex color string from the palette
    pub color: String,
}

impl Default for ToolSelection {
    fn default() -> Self {
        Self {
            tool: None,
            color: PaletteColor::default().hex().to_string(),
        }
    }
}

impl ToolSelection {
    pub fn new(tool: Option<AnnotationKind>, color: impl Into<String>) -> Self {
        Self {
            tool,
            color: color.into(),
        }
    }

    pub fn select_mode() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: Option<AnnotationKind>) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn is_select_mode(&self) -> bool {
        self.tool.is_none()
    }

    /// Color stored on annotations created with this selection
    ///
    /// Redactions are always black.
    pub fn creation_color(&self) -> String {
        match self.tool {
            Some(AnnotationKind::Redaction) => PaletteColor::Black.hex().to_string(),
            _ => self.color.clone(),
        }
    }

    /// The color picker is hidden in select mode and for redactions
    pub fn shows_color_picker(&self) -> bool {
        !matches!(self.tool, None | Some(AnnotationKind::Redaction))
    }
}

/// Keys the overlay understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Char(char),
}

impl Key {
    /// Parse a DOM-style key name (`"Escape"`, `"Delete"`, `"h"`)
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Escape" | "Esc" | "escape" | "esc" => Some(Key::Escape),
            "Delete" | "Del" | "delete" | "del" => Some(Key::Delete),
            "Backspace" | "backspace" => Some(Key::Backspace),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c.to_ascii_lowercase())),
                    _ => None,
                }
            }
        }
    }
}

/// A key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }
}

/// What a keyboard shortcut asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectTool(Option<AnnotationKind>),
    DeleteSelection,
}

/// Map a key press to a shortcut
///
/// `R` is ignored with ctrl/meta held so that reload keeps working.
pub fn shortcut(input: KeyInput) -> Option<ShortcutAction> {
    match input.key {
        Key::Escape => Some(ShortcutAction::SelectTool(None)),
        Key::Delete | Key::Backspace => Some(ShortcutAction::DeleteSelection),
        Key::Char('h') => Some(ShortcutAction::SelectTool(Some(AnnotationKind::Highlight))),
        Key::Char('n') => Some(ShortcutAction::SelectTool(Some(AnnotationKind::StickyNote))),
        Key::Char('r') if !input.ctrl && !input.meta => {
            Some(ShortcutAction::SelectTool(Some(AnnotationKind::Redaction)))
        }
        Key::Char(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_select_mode_yellow() {
        let selection = ToolSelection::default();
        assert!(selection.is_select_mode());
        assert_eq!(selection.color, "#FFEB3B");
        assert!(!selection.shows_color_picker());
    }

    #[test]
    fn test_redaction_forces_black() {
        let selection = ToolSelection::new(Some(AnnotationKind::Redaction), "#4CAF50");
        assert_eq!(selection.creation_color(), "#000000");
        assert!(!selection.shows_color_picker());

        let highlight = selection.with_tool(Some(AnnotationKind::Highlight));
        assert_eq!(highlight.creation_color(), "#4CAF50");
        assert!(highlight.shows_color_picker());
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("Escape"), Some(Key::Escape));
        assert_eq!(Key::parse("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::parse("H"), Some(Key::Char('h')));
        assert_eq!(Key::parse("F5"), None);
        assert_eq!(Key::parse(""), None);
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            shortcut(KeyInput::plain(Key::Char('h'))),
            Some(ShortcutAction::SelectTool(Some(AnnotationKind::Highlight)))
        );
        assert_eq!(
            shortcut(KeyInput::plain(Key::Char('n'))),
            Some(ShortcutAction::SelectTool(Some(AnnotationKind::StickyNote)))
        );
        assert_eq!(
            shortcut(KeyInput::plain(Key::Escape)),
            Some(ShortcutAction::SelectTool(None))
        );
        assert_eq!(
            shortcut(KeyInput::plain(Key::Backspace)),
            Some(ShortcutAction::DeleteSelection)
        );
        assert_eq!(shortcut(KeyInput::plain(Key::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_r_is_not_redaction() {
        let reload = KeyInput {
            key: Key::Char('r'),
            ctrl: true,
            meta: false,
        };
        assert_eq!(shortcut(reload), None);
        assert_eq!(
            shortcut(KeyInput::plain(Key::Char('r'))),
            Some(ShortcutAction::SelectTool(Some(AnnotationKind::Redaction)))
        );
    }
}
