//! Replay scripts: a page setup plus a list of overlay events

use anyhow::{anyhow, Result};
use doc_annotator_core::{AnnotationKind, ScreenPoint};
use doc_annotator_ui::{Key, KeyInput, LayerEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_document")]
    pub document_id: String,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default = "letter_width")]
    pub page_width: f32,
    #[serde(default = "letter_height")]
    pub page_height: f32,
    /// Initial tool; absent or `"select"` is select mode
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub events: Vec<Step>,
}

fn default_document() -> String {
    "doc-1".to_string()
}

fn first_page() -> u32 {
    1
}

fn unit_scale() -> f32 {
    1.0
}

fn letter_width() -> f32 {
    612.0
}

fn letter_height() -> f32 {
    792.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerLeave,
    NoteInput { text: String },
    NoteSave,
    NoteCancel,
    DeleteSelected,
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
    },
    /// Host changes tool and/or color
    Tool {
        #[serde(default)]
        tool: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
    Page { number: u32 },
    Zoom { scale: f32 },
}

impl Step {
    /// The overlay event for this step, if it is one
    pub fn to_event(&self) -> Result<Option<LayerEvent>> {
        let event = match self {
            Step::PointerDown { x, y } => LayerEvent::PointerDown(ScreenPoint::new(*x, *y)),
            Step::PointerMove { x, y } => LayerEvent::PointerMove(ScreenPoint::new(*x, *y)),
            Step::PointerUp { x, y } => LayerEvent::PointerUp(ScreenPoint::new(*x, *y)),
            Step::PointerLeave => LayerEvent::PointerLeave,
            Step::NoteInput { text } => LayerEvent::NoteInput(text.clone()),
            Step::NoteSave => LayerEvent::NoteSave,
            Step::NoteCancel => LayerEvent::NoteCancel,
            Step::DeleteSelected => LayerEvent::DeleteSelected,
            Step::Key { key, ctrl, meta } => {
                let key = Key::parse(key).ok_or_else(|| anyhow!("unknown key '{key}'"))?;
                LayerEvent::Key(KeyInput {
                    key,
                    ctrl: *ctrl,
                    meta: *meta,
                })
            }
            Step::Tool { .. } | Step::Page { .. } | Step::Zoom { .. } => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// `None`/`"select"` is select mode; anything else must name an annotation type
pub fn parse_tool(tool: Option<&str>) -> Result<Option<AnnotationKind>> {
    match tool {
        None => Ok(None),
        Some(name) if name.eq_ignore_ascii_case("select") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(|e: String| anyhow!(e)),
    }
}
