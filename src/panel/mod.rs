//! The annotation panel.
//!
//! Composes the editor state, the sync dispatcher, the modifier override and
//! label hotkeys into the props the canvas paints, and routes the canvas's
//! box lifecycle events back into the edit session.

mod canvas;

#[cfg(test)]
mod tests;

pub use canvas::{Canvas, CanvasEvent, CanvasProps};

use std::rc::Rc;

use crate::color_utils::{Color, ColorMap, Palette};
use crate::config::AppConfig;
use crate::editor::SharedEditor;
use crate::error::EditError;
use crate::event::{EventHub, FocusProbe, SessionEvent, Subscription};
use crate::input_mode::{InputModeResolver, MountedInputMode};
use crate::keybindings::KeyBindings;
use crate::label_cycler::LabelCycler;
use crate::model::{AnnotationBox, Tool};
use crate::session::{FinishOutcome, merge_render_list};
use crate::sync::SharedSync;

/// A mounted annotation panel.
///
/// Keyboard listeners stay attached to the hub for the panel's lifetime and
/// are detached when it is dropped. Queued commits are owned by the
/// dispatcher and survive the panel.
pub struct AnnotationPanel {
    editor: SharedEditor,
    sync: SharedSync,
    palette: Palette,
    input_mode: MountedInputMode,
    _label_keys: Subscription,
}

impl AnnotationPanel {
    /// Mount the panel and attach its keyboard listeners.
    pub fn mount(
        hub: &EventHub,
        focus: Rc<dyn FocusProbe>,
        bindings: KeyBindings,
        palette: Palette,
        editor: SharedEditor,
        sync: SharedSync,
    ) -> Self {
        let input_mode = InputModeResolver::new(Rc::clone(&focus)).mount(hub);

        let cycler = LabelCycler::new(bindings, focus);
        let label_editor = Rc::clone(&editor);
        let label_sync = Rc::clone(&sync);
        let label_keys = hub.subscribe(move |event| {
            let SessionEvent::KeyDown(key) = event else {
                return;
            };
            let sync = label_sync.borrow();
            let mut editor = label_editor.borrow_mut();
            let labels = &sync.collection().labels;
            if let Some(next) = cycler.on_key_down(key, labels, editor.active_label.as_deref()) {
                editor.active_label = Some(next);
            }
        });

        log::debug!("Annotation panel mounted");
        Self {
            editor,
            sync,
            palette,
            input_mode,
            _label_keys: label_keys,
        }
    }

    /// Mount with bindings and palette taken from the configuration.
    pub fn from_config(
        hub: &EventHub,
        focus: Rc<dyn FocusProbe>,
        config: &AppConfig,
        editor: SharedEditor,
        sync: SharedSync,
    ) -> Self {
        Self::mount(
            hub,
            focus,
            config.keybindings.to_keybindings(),
            config.palette,
            editor,
            sync,
        )
    }

    pub fn editor(&self) -> &SharedEditor {
        &self.editor
    }

    pub fn sync(&self) -> &SharedSync {
        &self.sync
    }

    /// The tool in force after the modifier override.
    pub fn effective_tool(&self) -> Tool {
        self.input_mode.effective_tool(self.editor.borrow().tool)
    }

    /// Build the props for the next frame.
    pub fn props(&self) -> CanvasProps {
        let editor = self.editor.borrow();
        let sync = self.sync.borrow();
        let collection = sync.collection();

        let color_map = ColorMap::from_labels(&collection.labels, &self.palette);
        let active_color = editor
            .active_label
            .as_deref()
            .map(|label| color_map.color_for(label))
            .unwrap_or_else(Color::neutral);

        let committed = editor
            .selected_image
            .as_ref()
            .map(|image| collection.boxes(image))
            .unwrap_or_default();
        let boxes = merge_render_list(committed, editor.active_box());

        let mode = self.input_mode.effective_tool(editor.tool);
        CanvasProps {
            mode,
            active_label: editor.active_label.clone(),
            color_map,
            active_color,
            crosshair: mode == Tool::Draw,
            boxes,
            image: editor.selected_image.clone(),
            hovered: editor.hovered_box.clone(),
        }
    }

    /// Paint the current state.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.paint(&self.props());
    }

    /// Canvas callback: pointer-down started an edit.
    pub fn on_box_started(&self, bbox: AnnotationBox) {
        self.editor.borrow_mut().session.start(bbox);
    }

    /// Canvas callback: the edited box moved.
    pub fn on_box_changed(&self, bbox: AnnotationBox) {
        self.editor.borrow_mut().session.update(bbox);
    }

    /// Canvas callback: pointer released, commit the edit.
    pub fn on_box_finished(&self, bbox: AnnotationBox) -> Result<FinishOutcome, EditError> {
        let mut editor = self.editor.borrow_mut();
        let mut sync = self.sync.borrow_mut();
        let editor = &mut *editor;
        editor.session.finish(
            bbox,
            editor.selected_image.as_ref(),
            &mut sync,
            &mut editor.active_label,
        )
    }

    /// Route a canvas lifecycle event to the matching callback.
    ///
    /// Returns the commit outcome for `Finished`, `None` otherwise.
    pub fn handle_canvas_event(
        &self,
        event: CanvasEvent,
    ) -> Result<Option<FinishOutcome>, EditError> {
        match event {
            CanvasEvent::Started(bbox) => {
                self.on_box_started(bbox);
                Ok(None)
            }
            CanvasEvent::Changed(bbox) => {
                self.on_box_changed(bbox);
                Ok(None)
            }
            CanvasEvent::Finished(bbox) => self.on_box_finished(bbox).map(Some),
        }
    }

    /// Detach listeners. Equivalent to dropping the panel.
    pub fn unmount(self) {
        log::debug!("Annotation panel unmounted");
    }
}

impl std::fmt::Debug for AnnotationPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationPanel")
            .field("palette", &self.palette)
            .field("input_mode", &self.input_mode)
            .finish_non_exhaustive()
    }
}
