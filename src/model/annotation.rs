//! Box annotation types and data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a box annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(String);

impl BoxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an image inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drawing tools the user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer-down starts a new box
    #[default]
    Draw,
    /// Pointer-down grabs an existing box to move or resize it
    Move,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Draw => "Draw",
            Tool::Move => "Move",
        }
    }
}

/// An axis-aligned rectangle in image coordinates.
///
/// Corners are stored as given by the canvas; `x1 <= x2` is not required while
/// a box is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Degenerate rectangle at a single point (pointer-down position).
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Create a normalized rectangle from two corner points.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        Self::new(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
    }

    /// Same rectangle with `x1 <= x2` and `y1 <= y2`.
    pub fn normalized(&self) -> Self {
        Self::from_corners((self.x1, self.y1), (self.x2, self.y2))
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).abs()
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Check if a point is inside the rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let r = self.normalized();
        x >= r.x1 && x <= r.x2 && y >= r.y1 && y <= r.y2
    }
}

/// A labeled box annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBox {
    pub id: BoxId,
    #[serde(flatten)]
    pub rect: Rect,
    pub label: String,
}

impl AnnotationBox {
    /// Create a box with a freshly generated id.
    pub fn new(rect: Rect, label: impl Into<String>) -> Self {
        Self::with_id(BoxId::generate(), rect, label)
    }

    pub fn with_id(id: BoxId, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            id,
            rect,
            label: label.into(),
        }
    }

    /// Same identity and label, new geometry.
    pub fn moved_to(&self, rect: Rect) -> Self {
        Self {
            rect,
            ..self.clone()
        }
    }
}
