//! Overlay colors and stroke widths.
//!
//! Annotation fills come from each record's stored color; everything the
//! overlay draws on its own account (selection borders, note outlines,
//! redaction fill) comes from here.

use crate::scene::Color;
use doc_annotator_core::PaletteColor;

/// Stroke widths in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeWidths {
    /// Selection border around highlights and redactions
    pub selection: f32,
    /// Outline around every sticky-note icon
    pub note_border: f32,
    /// Selection ring around a sticky-note icon
    pub note_selection: f32,
    /// Gap between a note icon and its selection ring
    pub note_selection_offset: f32,
    /// Outline of the in-progress draft rectangle
    pub draft: f32,
}

/// Semantic colors for the annotation overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTheme {
    /// Selection accent (highlights and notes)
    pub accent: Color,
    /// Selection color for redactions
    pub alert: Color,
    /// Outline around note icons
    pub note_border: Color,
    /// Redaction fill; stored colors are ignored for redactions
    pub redaction_fill: Color,
    pub strokes: StrokeWidths,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            accent: Color::from_palette(PaletteColor::Blue.color(), 1.0),
            alert: Color::from_palette(PaletteColor::Red.color(), 1.0),
            note_border: Color::rgb(0.0, 0.0, 0.0),
            redaction_fill: Color::rgb(0.0, 0.0, 0.0),
            strokes: StrokeWidths {
                selection: 2.0,
                note_border: 1.0,
                note_selection: 3.0,
                note_selection_offset: 2.0,
                draft: 2.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accents() {
        let theme = OverlayTheme::default();
        // #2196F3
        assert!((theme.accent.r - 33.0 / 255.0).abs() < 1e-6);
        assert!((theme.accent.b - 243.0 / 255.0).abs() < 1e-6);
        // #F44336
        assert!((theme.alert.r - 244.0 / 255.0).abs() < 1e-6);
        assert_eq!(theme.redaction_fill.a, 1.0);
        assert_eq!(theme.strokes.note_selection, 3.0);
    }
}
