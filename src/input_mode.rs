//! Modifier-key override of the selected drawing tool.
//!
//! Holding Control (Command on macOS) temporarily switches the effective tool
//! to [`Tool::Move`] so existing boxes can be grabbed without leaving draw mode.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EventHub, FocusProbe, SessionEvent, Subscription};
use crate::model::Tool;

/// Tracks whether the move override is engaged.
pub struct InputModeResolver {
    engaged: bool,
    focus: Rc<dyn FocusProbe>,
}

impl InputModeResolver {
    pub fn new(focus: Rc<dyn FocusProbe>) -> Self {
        Self {
            engaged: false,
            focus,
        }
    }

    /// Apply one session event to the override state.
    pub fn handle(&mut self, event: &SessionEvent) {
        let engaged = match event {
            SessionEvent::KeyDown(_) if self.focus.text_input_focused() => false,
            SessionEvent::KeyDown(key) => {
                let mut engaged = self.engaged;
                if key.modifiers.command() {
                    engaged = true;
                }
                // Shift means the user is drawing; it beats the override.
                if key.modifiers.shift {
                    engaged = false;
                }
                engaged
            }
            SessionEvent::KeyUp(_) | SessionEvent::VisibilityLost | SessionEvent::WindowBlur => {
                false
            }
        };
        if engaged != self.engaged {
            log::debug!("Move override {}", if engaged { "engaged" } else { "released" });
            self.engaged = engaged;
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// The tool actually in force given the user's selection.
    pub fn effective_tool(&self, selected: Tool) -> Tool {
        if self.engaged { Tool::Move } else { selected }
    }

    /// Attach to the hub. The listener stays registered until the returned
    /// handle is dropped or unmounted.
    pub fn mount(self, hub: &EventHub) -> MountedInputMode {
        let state = Rc::new(RefCell::new(self));
        let listener_state = Rc::clone(&state);
        let subscription = hub.subscribe(move |event| listener_state.borrow_mut().handle(event));
        MountedInputMode {
            state,
            _subscription: subscription,
        }
    }
}

impl std::fmt::Debug for InputModeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputModeResolver")
            .field("engaged", &self.engaged)
            .finish_non_exhaustive()
    }
}

/// An [`InputModeResolver`] attached to an [`EventHub`].
#[derive(Debug)]
pub struct MountedInputMode {
    state: Rc<RefCell<InputModeResolver>>,
    _subscription: Subscription,
}

impl MountedInputMode {
    pub fn is_engaged(&self) -> bool {
        self.state.borrow().is_engaged()
    }

    pub fn effective_tool(&self, selected: Tool) -> Tool {
        self.state.borrow().effective_tool(selected)
    }

    /// Detach the listener.
    pub fn unmount(self) {}
}
