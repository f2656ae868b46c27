//! Boundary with the canvas that paints boxes and reports pointer edits.

use crate::color_utils::{Color, ColorMap};
use crate::constants::UNTITLED_LABEL;
use crate::model::{AnnotationBox, BoxId, ImageId, Tool};

/// Everything the canvas needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasProps {
    /// Effective tool after the modifier override
    pub mode: Tool,
    pub active_label: Option<String>,
    pub color_map: ColorMap,
    /// Color of the active label, neutral when unset or unknown
    pub active_color: Color,
    /// Whether the crosshair cursor is shown
    pub crosshair: bool,
    /// Boxes in paint order, the edited box first
    pub boxes: Vec<AnnotationBox>,
    pub image: Option<ImageId>,
    pub hovered: Option<BoxId>,
}

impl CanvasProps {
    /// Label stamped on a freshly drawn box.
    pub fn draw_label(&self) -> &str {
        self.active_label.as_deref().unwrap_or(UNTITLED_LABEL)
    }
}

/// Pointer-driven box lifecycle reported by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Pointer-down on empty space (draw) or on a box (move)
    Started(AnnotationBox),
    /// Pointer moved while dragging
    Changed(AnnotationBox),
    /// Pointer released
    Finished(AnnotationBox),
}

/// A surface that renders the image and its boxes.
///
/// Hit testing and corner geometry are the implementor's concern.
pub trait Canvas {
    fn paint(&mut self, props: &CanvasProps);
}
