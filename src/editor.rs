//! Editing session state shared between event callbacks and rendering.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{AnnotationBox, BoxId, ImageId, Tool};
use crate::session::BoxEditSession;

/// Editor state shared by the panel, its listeners and the host.
pub type SharedEditor = Rc<RefCell<EditorState>>;

/// Session-scoped editor state.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// The box edit state machine (owns the active box)
    pub session: BoxEditSession,
    /// Label used for new boxes and highlighted in the canvas
    pub active_label: Option<String>,
    /// Box under the pointer, for highlighting only
    pub hovered_box: Option<BoxId>,
    /// Tool the user selected, before any modifier override
    pub tool: Tool,
    /// Image currently shown
    pub selected_image: Option<ImageId>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(tool: Tool) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn into_shared(self) -> SharedEditor {
        Rc::new(RefCell::new(self))
    }

    pub fn active_box(&self) -> Option<&AnnotationBox> {
        self.session.active_box()
    }

    pub fn select_image(&mut self, image: ImageId) {
        log::debug!("Selected image {}", image);
        self.hovered_box = None;
        self.selected_image = Some(image);
    }

    pub fn set_active_label(&mut self, label: impl Into<String>) {
        self.active_label = Some(label.into());
    }

    pub fn set_hovered(&mut self, id: Option<BoxId>) {
        self.hovered_box = id;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }
}
