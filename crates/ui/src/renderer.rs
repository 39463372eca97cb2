//! Overlay renderer
//!
//! Builds a complete [`Scene`] from the current view of one page. Every call
//! starts from a clear surface and paints the page's annotations in list
//! order, then the draft rectangle on top.

use crate::scene::{Color, Scene};
use crate::theme::OverlayTheme;
use crate::tools::ToolSelection;
use doc_annotator_core::{
    Annotation, AnnotationId, AnnotationKind, LayerConfig, PaletteColor, Rect, Scale,
};

/// Everything one frame depends on
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    /// Annotations of the current page, in paint order
    pub annotations: &'a [&'a Annotation],
    pub scale: Scale,
    /// Surface size in pixels
    pub surface: (f32, f32),
    pub hovered: Option<&'a AnnotationId>,
    pub selected: Option<&'a AnnotationId>,
    /// Document-space draft rectangle while dragging
    pub draft: Option<Rect>,
    pub tool: &'a ToolSelection,
}

/// Stateless painter for the annotation overlay
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    config: LayerConfig,
    theme: OverlayTheme,
}

impl OverlayRenderer {
    pub fn new(config: LayerConfig, theme: OverlayTheme) -> Self {
        Self { config, theme }
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn theme(&self) -> &OverlayTheme {
        &self.theme
    }

    /// Render a full frame
    pub fn render(&self, view: &RenderView<'_>) -> Scene {
        let mut scene = Scene::new(view.surface.0, view.surface.1);

        for annotation in view.annotations {
            let hovered = view.hovered == Some(&annotation.id);
            let selected = view.selected == Some(&annotation.id);
            self.paint_annotation(&mut scene, annotation, view.scale, hovered, selected);
        }

        if let Some(draft) = view.draft {
            self.paint_draft(&mut scene, &draft, view.scale, view.tool);
        }

        scene
    }

    fn paint_annotation(
        &self,
        scene: &mut Scene,
        annotation: &Annotation,
        scale: Scale,
        hovered: bool,
        selected: bool,
    ) {
        let strokes = &self.theme.strokes;
        let rect = annotation.screen_box(scale, self.config.note_icon_size);

        match annotation.kind {
            AnnotationKind::Highlight => {
                let opacity = self.config.highlight_opacity.pick(hovered);
                scene.fill_rect(rect, Color::from_palette(annotation.paint_color(), opacity));
                if selected {
                    scene.stroke_rect(rect, self.theme.accent, strokes.selection);
                }
            }
            AnnotationKind::Redaction => {
                scene.fill_rect(rect, self.theme.redaction_fill);
                if selected {
                    scene.stroke_rect(rect, self.theme.alert, strokes.selection);
                }
            }
            AnnotationKind::StickyNote => {
                let opacity = self.config.note_opacity.pick(hovered);
                scene.fill_rect(rect, Color::from_palette(annotation.paint_color(), opacity));
                scene.stroke_rect(rect, self.theme.note_border, strokes.note_border);
                if selected {
                    scene.stroke_rect(
                        rect.outset(strokes.note_selection_offset),
                        self.theme.accent,
                        strokes.note_selection,
                    );
                }
            }
            // Comments are hit-testable but have no visual.
            AnnotationKind::Comment => {}
        }
    }

    fn paint_draft(&self, scene: &mut Scene, draft: &Rect, scale: Scale, tool: &ToolSelection) {
        let rect = scale.rect_to_screen(draft);
        let color = doc_annotator_core::Color::from_hex(&tool.color)
            .unwrap_or_else(|| PaletteColor::default().color());

        match tool.tool {
            Some(AnnotationKind::Redaction) => scene.fill_rect(
                rect,
                self.theme
                    .redaction_fill
                    .with_alpha(self.config.draft_redaction_opacity),
            ),
            Some(AnnotationKind::Highlight) => scene.fill_rect(
                rect,
                Color::from_palette(color, self.config.draft_highlight_opacity),
            ),
            _ => {}
        }

        scene.dashed_rect(
            rect,
            Color::from_palette(color, 1.0),
            self.theme.strokes.draft,
            self.config.draft_dash,
        );
    }
}
