//! Keyboard and focus events, and the hub that fans them out to listeners.
//!
//! The hub stands in for the document's global listener list. Hosts feed it
//! events (the browser bindings in `web` do this on wasm32), and components
//! subscribe for the lifetime of a mount. Dropping the returned
//! [`Subscription`] detaches the listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Keyboard keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
    Control,
    Meta,
    Shift,
    Alt,
    /// Any key without a dedicated variant
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return if c == ' ' { Key::Space } else { Key::Char(c) };
        }
        match key {
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Tab" => Key::Tab,
            "Control" => Key::Control,
            "Meta" | "OS" => Key::Meta,
            "Shift" => Key::Shift,
            "Alt" => Key::Alt,
            _ => Key::Other,
        }
    }

    /// Lowercase form of character keys; other keys are returned unchanged.
    pub fn to_lowercase(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_lowercase().next().unwrap_or(c)),
            other => other,
        }
    }
}

/// Keyboard modifiers held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Control on most platforms, Command on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }
}

/// Events delivered through the [`EventHub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// The document became hidden (tab switch, minimize)
    VisibilityLost,
    /// The window lost focus
    WindowBlur,
}

/// Reports whether a text-input element currently has keyboard focus.
pub trait FocusProbe {
    fn text_input_focused(&self) -> bool;
}

/// Focus probe for hosts without text fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextFocus;

impl FocusProbe for NoTextFocus {
    fn text_input_focused(&self) -> bool {
        false
    }
}

/// Focus probe backed by a flag the host toggles.
#[derive(Debug, Default)]
pub struct FocusFlag(Cell<bool>);

impl FocusFlag {
    pub fn set(&self, focused: bool) {
        self.0.set(focused);
    }
}

impl FocusProbe for FocusFlag {
    fn text_input_focused(&self) -> bool {
        self.0.get()
    }
}

type Listener = Rc<dyn Fn(&SessionEvent)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Single-threaded fan-out of session events.
///
/// Cloning the hub yields another handle to the same listener list.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener until the returned subscription is dropped.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        log::trace!("Event listener {} attached", id);
        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every listener registered at the time of the call.
    pub fn emit(&self, event: SessionEvent) {
        // Snapshot so listeners may subscribe or unsubscribe while handling.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Guard for a registered listener. Detaches on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    hub: std::rc::Weak<RefCell<HubInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
            log::trace!("Event listener {} detached", self.id);
        }
    }
}
