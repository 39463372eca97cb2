//! Annotation layer compositor
//!
//! Ties the interaction controller and the renderer to the host page. The
//! host pushes the page, zoom, tool and live annotation list in; pointer and
//! dialog events go through [`AnnotationLayer::handle`]. Every change
//! produces a fresh [`Scene`].

use crate::controller::{Cursor, Effect, InteractionController, LayerContext, LayerEvent};
use crate::note_dialog::NoteDraft;
use crate::renderer::{OverlayRenderer, RenderView};
use crate::scene::Scene;
use crate::theme::OverlayTheme;
use crate::tools::ToolSelection;
use doc_annotator_core::{
    page_surface_size, Annotation, AnnotationCollection, AnnotationId, AnnotationStats,
    DocumentId, LayerConfig, Scale, ScreenPoint,
};

/// Inputs supplied by the host viewer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerProps {
    pub document_id: DocumentId,
    /// 1-based page currently shown
    pub page_number: u32,
    /// Unscaled page width (document units)
    pub page_width: f32,
    /// Unscaled page height (document units)
    pub page_height: f32,
    pub scale: Scale,
    pub tool: ToolSelection,
}

impl LayerProps {
    pub fn new(document_id: DocumentId, page_width: f32, page_height: f32) -> Self {
        Self {
            document_id,
            page_number: 1,
            page_width,
            page_height,
            scale: Scale::IDENTITY,
            tool: ToolSelection::default(),
        }
    }
}

/// The note dialog as the host should show it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteDialogView<'a> {
    pub draft: &'a NoteDraft,
    /// Top-left corner on the surface
    pub at: ScreenPoint,
}

/// Overlay for one page of a document
pub struct AnnotationLayer {
    props: LayerProps,
    annotations: AnnotationCollection,
    controller: InteractionController,
    renderer: OverlayRenderer,
    scene: Scene,
    frame: u64,
}

impl AnnotationLayer {
    pub fn new(props: LayerProps, config: LayerConfig) -> Self {
        Self::with_theme(props, config, OverlayTheme::default())
    }

    pub fn with_theme(props: LayerProps, config: LayerConfig, theme: OverlayTheme) -> Self {
        let (width, height) = page_surface_size(props.page_width, props.page_height, props.scale);
        let mut layer = Self {
            props,
            annotations: AnnotationCollection::new(),
            controller: InteractionController::new(),
            renderer: OverlayRenderer::new(config, theme),
            scene: Scene::new(width, height),
            frame: 0,
        };
        layer.redraw();
        layer
    }

    /// Replace the live annotation list (whole document)
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) -> Vec<Effect> {
        self.annotations.replace_all(annotations);
        let effects = self.forget_off_page();
        self.redraw();
        effects
    }

    pub fn set_page(&mut self, page_number: u32) -> Vec<Effect> {
        if page_number == self.props.page_number {
            return Vec::new();
        }
        self.props.page_number = page_number;
        self.controller.cancel();
        let effects = self.forget_off_page();
        self.redraw();
        effects
    }

    pub fn set_scale(&mut self, scale: Scale) {
        if scale != self.props.scale {
            self.props.scale = scale;
            self.redraw();
        }
    }

    pub fn set_page_size(&mut self, page_width: f32, page_height: f32) {
        self.props.page_width = page_width;
        self.props.page_height = page_height;
        self.redraw();
    }

    /// Change the active tool or color
    pub fn set_tool(&mut self, tool: ToolSelection) -> Vec<Effect> {
        if tool == self.props.tool {
            return Vec::new();
        }
        self.props.tool = tool;
        self.handle(&LayerEvent::ToolChanged)
    }

    /// Feed a pointer, dialog or keyboard event
    pub fn handle(&mut self, event: &LayerEvent) -> Vec<Effect> {
        let effects = {
            let page = self.annotations.for_page(self.props.page_number);
            let ctx = LayerContext {
                document_id: &self.props.document_id,
                page_number: self.props.page_number,
                scale: self.props.scale,
                tool: &self.props.tool,
                annotations: &page,
                config: self.renderer.config(),
            };
            self.controller.handle(event, &ctx)
        };
        self.redraw();
        effects
    }

    fn forget_off_page(&mut self) -> Vec<Effect> {
        let page_number = self.props.page_number;
        let annotations = &self.annotations;
        self.controller.forget_missing(|id| {
            annotations
                .get(id)
                .is_some_and(|a| a.page_number == page_number)
        })
    }

    fn redraw(&mut self) {
        let surface = self.surface_size();
        let page = self.annotations.for_page(self.props.page_number);
        let view = RenderView {
            annotations: &page,
            scale: self.props.scale,
            surface,
            hovered: self.controller.hovered(),
            selected: self.controller.selected(),
            draft: self.controller.draft_rect(),
            tool: &self.props.tool,
        };
        self.scene = self.renderer.render(&view);
        self.frame += 1;
        tracing::trace!(frame = self.frame, primitives = self.scene.len(), "overlay redrawn");
    }

    pub fn props(&self) -> &LayerProps {
        &self.props
    }

    /// Latest frame
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of frames rendered so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn surface_size(&self) -> (f32, f32) {
        page_surface_size(self.props.page_width, self.props.page_height, self.props.scale)
    }

    pub fn annotations(&self) -> &AnnotationCollection {
        &self.annotations
    }

    pub fn page_annotations(&self) -> Vec<&Annotation> {
        self.annotations.for_page(self.props.page_number)
    }

    pub fn stats(&self) -> AnnotationStats {
        self.annotations.stats()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.controller.selected()
    }

    pub fn hovered(&self) -> Option<&AnnotationId> {
        self.controller.hovered()
    }

    pub fn cursor(&self) -> Cursor {
        self.controller.cursor()
    }

    pub fn note_dialog(&self) -> Option<NoteDialogView<'_>> {
        let draft = self.controller.note_draft()?;
        let at = draft.placement(
            self.props.scale,
            self.renderer.config().note_dialog_offset,
            self.surface_size(),
        );
        Some(NoteDialogView { draft, at })
    }

    /// The delete button shows only for a selection with no dialog open
    pub fn delete_affordance_visible(&self) -> bool {
        self.controller.selected().is_some() && self.controller.note_draft().is_none()
    }
}
