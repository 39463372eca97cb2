//! Pointer interaction state machine
//!
//! Turns pointer, dialog and keyboard events into annotation requests. The
//! machine has three modes:
//!
//! - `Idle`: nothing in progress; clicks select or start a new annotation
//! - `Drawing`: a drag rectangle is being sized for a highlight/redaction/comment
//! - `NoteDialogOpen`: sticky-note text entry is pending (new or edit)
//!
//! Hover and selection live beside the mode and are tracked in every mode.
//! [`transition`] is a pure function; [`InteractionController`] keeps the
//! current state between events.
//!
//! Requests leave the machine as [`Effect`]s. The machine never mutates the
//! annotation list itself: created, updated and deleted records come back
//! from the store and are fed in through [`LayerContext::annotations`].

use crate::hit_test::hit_test;
use crate::note_dialog::{NoteDraft, NoteMode};
use crate::tools::{shortcut, Key, KeyInput, ShortcutAction, ToolSelection};
use doc_annotator_core::{
    Annotation, AnnotationId, AnnotationInput, AnnotationKind, AnnotationPatch, DocPoint,
    DocumentId, LayerConfig, Rect, Scale, ScreenPoint,
};
use serde::Serialize;

/// Pointer cursor requested for the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Pointer,
}

/// Interaction mode
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mode {
    #[default]
    Idle,
    /// Drag in progress; both values are in document space
    Drawing { anchor: DocPoint, current: Rect },
    NoteDialogOpen(NoteDraft),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Drawing { .. } => "drawing",
            Mode::NoteDialogOpen(_) => "note_dialog_open",
        }
    }
}

/// Complete controller state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    pub mode: Mode,
    pub hovered: Option<AnnotationId>,
    pub selected: Option<AnnotationId>,
    pub cursor: Cursor,
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent {
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp(ScreenPoint),
    PointerLeave,
    /// Replace the note dialog text
    NoteInput(String),
    NoteSave,
    NoteCancel,
    /// Delete the selected annotation (the overlay's delete button)
    DeleteSelected,
    Key(KeyInput),
    /// The host changed the active tool or color
    ToolChanged,
}

/// Client-side rejections; expected interaction noise, never shown to users
#[derive(Debug, Clone, Copy, PartialEq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("draft {width}x{height} does not exceed the minimum size")]
    DraftTooSmall { width: f32, height: f32 },
    #[error("pointer left the surface during a drag")]
    DraftAbandoned,
    #[error("drag finished with no drawing tool active")]
    NoActiveTool,
    #[error("note saved without a position")]
    MissingNotePosition,
}

/// Output of the state machine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Create { input: AnnotationInput },
    Update { id: AnnotationId, patch: AnnotationPatch },
    Delete { id: AnnotationId },
    Select { id: Option<AnnotationId> },
    SetCursor { cursor: Cursor },
    /// Ask the tool owner to switch tools (keyboard shortcut)
    SetTool { tool: Option<AnnotationKind> },
    Discarded { reason: ValidationError },
}

/// Everything the machine reads but does not own
#[derive(Debug, Clone, Copy)]
pub struct LayerContext<'a> {
    pub document_id: &'a DocumentId,
    /// 1-based page shown under the overlay
    pub page_number: u32,
    pub scale: Scale,
    pub tool: &'a ToolSelection,
    /// Annotations of the current page, in paint order
    pub annotations: &'a [&'a Annotation],
    pub config: &'a LayerConfig,
}

impl LayerContext<'_> {
    fn hit(&self, point: ScreenPoint) -> Option<&Annotation> {
        hit_test(
            self.annotations,
            point,
            self.scale,
            self.config.note_icon_size,
        )
    }
}

/// Apply one event to a state
pub fn transition(
    mut state: InteractionState,
    event: &LayerEvent,
    ctx: &LayerContext<'_>,
) -> (InteractionState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        LayerEvent::PointerDown(point) => pointer_down(&mut state, *point, ctx, &mut effects),
        LayerEvent::PointerMove(point) => pointer_move(&mut state, *point, ctx, &mut effects),
        LayerEvent::PointerUp(point) => pointer_up(&mut state, *point, ctx, &mut effects),
        LayerEvent::PointerLeave => {
            state.hovered = None;
            if matches!(state.mode, Mode::Drawing { .. }) {
                state.mode = Mode::Idle;
                effects.push(Effect::Discarded {
                    reason: ValidationError::DraftAbandoned,
                });
            }
        }
        LayerEvent::NoteInput(text) => {
            if let Mode::NoteDialogOpen(draft) = &mut state.mode {
                draft.content = text.clone();
            }
        }
        LayerEvent::NoteSave => note_save(&mut state, ctx, &mut effects),
        LayerEvent::NoteCancel => {
            if matches!(state.mode, Mode::NoteDialogOpen(_)) {
                state.mode = Mode::Idle;
            }
        }
        LayerEvent::DeleteSelected => delete_selected(&mut state, &mut effects),
        LayerEvent::Key(input) => key_press(&mut state, *input, &mut effects),
        LayerEvent::ToolChanged => {
            let hovering = state.hovered.is_some();
            update_cursor(&mut state, hovering, ctx.tool, &mut effects);
        }
    }

    (state, effects)
}

fn pointer_down(
    state: &mut InteractionState,
    point: ScreenPoint,
    ctx: &LayerContext<'_>,
    effects: &mut Vec<Effect>,
) {
    // A drag is owned by the first press.
    if matches!(state.mode, Mode::Drawing { .. }) {
        return;
    }

    // With the dialog open only a hit does anything: it selects, and a hit
    // note replaces the draft.
    if let Some(hit) = ctx.hit(point) {
        state.selected = Some(hit.id.clone());
        effects.push(Effect::Select {
            id: Some(hit.id.clone()),
        });
        if hit.kind == AnnotationKind::StickyNote {
            state.mode = Mode::NoteDialogOpen(NoteDraft::edit(hit));
        }
        return;
    }

    if !matches!(state.mode, Mode::Idle) {
        return;
    }

    let Some(tool) = ctx.tool.tool else {
        return;
    };

    let at = ctx.scale.point_to_document(point);
    state.mode = if tool == AnnotationKind::StickyNote {
        Mode::NoteDialogOpen(NoteDraft::create(at, ctx.config.note_icon_size))
    } else {
        Mode::Drawing {
            anchor: at,
            current: Rect::normalized(at, at),
        }
    };
}

fn pointer_move(
    state: &mut InteractionState,
    point: ScreenPoint,
    ctx: &LayerContext<'_>,
    effects: &mut Vec<Effect>,
) {
    let hit = ctx.hit(point).map(|a| a.id.clone());
    let hovering = hit.is_some();
    state.hovered = hit;
    update_cursor(state, hovering, ctx.tool, effects);

    if let Mode::Drawing { anchor, current } = &mut state.mode {
        *current = Rect::normalized(*anchor, ctx.scale.point_to_document(point));
    }
}

fn pointer_up(
    state: &mut InteractionState,
    point: ScreenPoint,
    ctx: &LayerContext<'_>,
    effects: &mut Vec<Effect>,
) {
    let anchor = match &state.mode {
        Mode::Drawing { anchor, .. } => *anchor,
        _ => return,
    };
    state.mode = Mode::Idle;

    let rect = Rect::normalized(anchor, ctx.scale.point_to_document(point));
    let kind = match ctx.tool.tool {
        Some(kind) if kind.is_drag_tool() => kind,
        _ => {
            effects.push(Effect::Discarded {
                reason: ValidationError::NoActiveTool,
            });
            return;
        }
    };

    if !rect.exceeds(ctx.config.min_drag_size) {
        effects.push(Effect::Discarded {
            reason: ValidationError::DraftTooSmall {
                width: rect.width,
                height: rect.height,
            },
        });
        return;
    }

    effects.push(Effect::Create {
        input: AnnotationInput {
            document_id: ctx.document_id.clone(),
            kind,
            page_number: ctx.page_number,
            position: rect,
            content: None,
            color: Some(ctx.tool.creation_color()),
        },
    });
}

fn note_save(state: &mut InteractionState, ctx: &LayerContext<'_>, effects: &mut Vec<Effect>) {
    let draft = match std::mem::take(&mut state.mode) {
        Mode::NoteDialogOpen(draft) => draft,
        other => {
            state.mode = other;
            effects.push(Effect::Discarded {
                reason: ValidationError::MissingNotePosition,
            });
            return;
        }
    };

    if draft.is_unchanged() {
        return;
    }

    match draft.mode {
        NoteMode::Create => effects.push(Effect::Create {
            input: AnnotationInput {
                document_id: ctx.document_id.clone(),
                kind: AnnotationKind::StickyNote,
                page_number: ctx.page_number,
                position: draft.position,
                content: Some(draft.content),
                color: Some(ctx.tool.color.clone()),
            },
        }),
        NoteMode::Edit { id, .. } => effects.push(Effect::Update {
            id,
            patch: AnnotationPatch::content(draft.content),
        }),
    }
}

fn delete_selected(state: &mut InteractionState, effects: &mut Vec<Effect>) {
    let Some(id) = state.selected.take() else {
        return;
    };

    if let Mode::NoteDialogOpen(draft) = &state.mode {
        if draft.editing_id() == Some(&id) {
            state.mode = Mode::Idle;
        }
    }
    if state.hovered.as_ref() == Some(&id) {
        state.hovered = None;
    }

    effects.push(Effect::Delete { id });
    effects.push(Effect::Select { id: None });
}

fn key_press(state: &mut InteractionState, input: KeyInput, effects: &mut Vec<Effect>) {
    // Keys typed into the note dialog belong to the text field; only Escape
    // reaches the overlay.
    if matches!(state.mode, Mode::NoteDialogOpen(_)) {
        if input.key == Key::Escape {
            state.mode = Mode::Idle;
            effects.push(Effect::SetTool { tool: None });
        }
        return;
    }

    match shortcut(input) {
        Some(ShortcutAction::SelectTool(tool)) => {
            if tool.is_none() && matches!(state.mode, Mode::Drawing { .. }) {
                state.mode = Mode::Idle;
                effects.push(Effect::Discarded {
                    reason: ValidationError::DraftAbandoned,
                });
            }
            effects.push(Effect::SetTool { tool });
        }
        Some(ShortcutAction::DeleteSelection) => delete_selected(state, effects),
        None => {}
    }
}

fn update_cursor(
    state: &mut InteractionState,
    hovering: bool,
    tool: &ToolSelection,
    effects: &mut Vec<Effect>,
) {
    let cursor = if hovering {
        Cursor::Pointer
    } else if tool.tool.is_some() {
        Cursor::Crosshair
    } else {
        Cursor::Default
    };

    if cursor != state.cursor {
        state.cursor = cursor;
        effects.push(Effect::SetCursor { cursor });
    }
}

/// Stateful wrapper around [`transition`]
#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event and return the requests it produced
    pub fn handle(&mut self, event: &LayerEvent, ctx: &LayerContext<'_>) -> Vec<Effect> {
        let previous = self.state.mode.name();
        let (next, effects) = transition(std::mem::take(&mut self.state), event, ctx);
        if next.mode.name() != previous {
            tracing::debug!(from = previous, to = next.mode.name(), "interaction mode changed");
        }
        for effect in &effects {
            if let Effect::Discarded { reason } = effect {
                tracing::debug!(%reason, "draft discarded");
            }
        }
        self.state = next;
        effects
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> &Mode {
        &self.state.mode
    }

    pub fn hovered(&self) -> Option<&AnnotationId> {
        self.state.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.state.selected.as_ref()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor
    }

    /// Document-space draft rectangle while dragging
    pub fn draft_rect(&self) -> Option<Rect> {
        match &self.state.mode {
            Mode::Drawing { current, .. } => Some(*current),
            _ => None,
        }
    }

    pub fn note_draft(&self) -> Option<&NoteDraft> {
        match &self.state.mode {
            Mode::NoteDialogOpen(draft) => Some(draft),
            _ => None,
        }
    }

    /// Abandon any drag or open dialog without emitting requests
    pub fn cancel(&mut self) {
        if !matches!(self.state.mode, Mode::Idle) {
            tracing::debug!(from = self.state.mode.name(), "interaction cancelled");
            self.state.mode = Mode::Idle;
        }
    }

    /// Host-driven selection (e.g. from an annotation list)
    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.state.selected = id;
    }

    /// Drop hover/selection/edit state pointing at annotations that no longer exist
    ///
    /// Returns a `Select { id: None }` effect when the selection was cleared.
    pub fn forget_missing(&mut self, exists: impl Fn(&AnnotationId) -> bool) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.state.hovered.as_ref().is_some_and(|id| !exists(id)) {
            self.state.hovered = None;
        }
        if self.state.selected.as_ref().is_some_and(|id| !exists(id)) {
            self.state.selected = None;
            effects.push(Effect::Select { id: None });
        }
        if let Mode::NoteDialogOpen(draft) = &self.state.mode {
            if draft.editing_id().is_some_and(|id| !exists(id)) {
                self.state.mode = Mode::Idle;
            }
        }

        effects
    }
}
