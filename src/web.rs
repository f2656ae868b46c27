//! Browser bindings (WASM only).
//!
//! Feeds document keyboard and visibility events plus window blur into an
//! [`EventHub`], and reports text-input focus from `document.activeElement`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, KeyboardEvent};

use crate::event::{EventHub, FocusProbe, Key, KeyEvent, Modifiers, SessionEvent};

fn key_event(event: &web_sys::Event) -> Option<KeyEvent> {
    let event = event.dyn_ref::<KeyboardEvent>()?;
    Some(KeyEvent::new(
        Key::from_dom(&event.key()),
        Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    ))
}

struct Registration {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

/// DOM listeners attached for one mount. Removed on drop.
pub struct DocumentEvents {
    registrations: Vec<Registration>,
}

impl DocumentEvents {
    /// Attach `keydown`, `keyup`, `visibilitychange` and `blur` listeners.
    pub fn attach(hub: &EventHub) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let document: EventTarget = document.into();
        let window: EventTarget = window.into();

        let mut events = Self {
            registrations: Vec::new(),
        };

        events.listen(&document, "keydown", hub, |event| {
            key_event(event).map(SessionEvent::KeyDown)
        })?;
        events.listen(&document, "keyup", hub, |event| {
            key_event(event).map(SessionEvent::KeyUp)
        })?;
        events.listen(&document, "visibilitychange", hub, |_| {
            Some(SessionEvent::VisibilityLost)
        })?;
        events.listen(&window, "blur", hub, |_| Some(SessionEvent::WindowBlur))?;

        log::debug!("Attached {} document listeners", events.registrations.len());
        Ok(events)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        hub: &EventHub,
        map: fn(&web_sys::Event) -> Option<SessionEvent>,
    ) -> Result<(), JsValue> {
        let hub = hub.clone();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let Some(session_event) = map(&event) {
                hub.emit(session_event);
            }
        });
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.registrations.push(Registration {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }
}

impl Drop for DocumentEvents {
    fn drop(&mut self) {
        for reg in self.registrations.drain(..) {
            if let Err(e) = reg
                .target
                .remove_event_listener_with_callback(reg.kind, reg.callback.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove '{}' listener: {:?}", reg.kind, e);
            }
        }
    }
}

/// Focus probe reading `document.activeElement`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomFocus;

impl FocusProbe for DomFocus {
    fn text_input_focused(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .map(|el| matches!(el.tag_name().to_lowercase().as_str(), "input" | "textarea"))
            .unwrap_or(false)
    }
}
