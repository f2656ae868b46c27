//! Keyboard selection of the active label.

use std::rc::Rc;

use crate::event::{FocusProbe, KeyEvent};
use crate::keybindings::KeyBindings;
use crate::model::LabelSet;

/// Maps key presses to label selections.
pub struct LabelCycler {
    bindings: KeyBindings,
    focus: Rc<dyn FocusProbe>,
}

impl LabelCycler {
    pub fn new(bindings: KeyBindings, focus: Rc<dyn FocusProbe>) -> Self {
        Self { bindings, focus }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Label selected by a key press, or `None` if the press changes nothing.
    pub fn on_key_down(
        &self,
        event: &KeyEvent,
        labels: &LabelSet,
        active: Option<&str>,
    ) -> Option<String> {
        if labels.is_empty() || self.focus.text_input_focused() {
            return None;
        }

        let index = if self.bindings.is_cycle_key(event.key) {
            // An unknown active label counts as -1, so cycling lands on the first.
            active
                .and_then(|label| labels.position(label))
                .map_or(0, |i| (i + 1) % labels.len())
        } else {
            self.bindings.label_index_for_key(event.key)?
        };

        let next = labels.get(index)?;
        log::debug!("Label hotkey {:?} selects '{}'", event.key, next);
        Some(next.to_string())
    }
}

impl std::fmt::Debug for LabelCycler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelCycler")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}
