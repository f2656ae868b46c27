//! Global constants for the annotation engine

/// Palette constants used when deriving label colors.
pub mod palette {
    /// Saturation shared by every label color (HSL, 0.0-1.0)
    pub const SATURATION: f32 = 0.9;
    /// Lightness shared by every label color (HSL, 0.0-1.0)
    pub const LIGHTNESS: f32 = 0.55;
    /// Neutral color used when a label has no slot in the color map
    pub const NEUTRAL: [u8; 3] = [255, 255, 255];
}

/// Maximum number of labels reachable through numeric hotkeys (1-9, 0).
pub const MAX_LABEL_HOTKEYS: usize = 10;

/// Label given to boxes drawn before any label exists.
pub const UNTITLED_LABEL: &str = "Untitled Label";
