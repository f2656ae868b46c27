//! End-to-end panel scenarios: keyboard, canvas lifecycle and remote sync.

use std::rc::Rc;

use super::*;
use crate::color_utils::{Color, Palette, unique_color};
use crate::editor::EditorState;
use crate::error::SyncError;
use crate::event::{FocusFlag, Key, KeyEvent, Modifiers, NoTextFocus};
use crate::model::{BoxId, Collection, CollectionKind, ImageId, Rect};
use crate::store::RemoteStore;
use crate::store::memory::{BucketRemote, InMemoryStore};
use crate::sync::{Commit, SyncDispatcher};

/// Canvas that keeps every frame it was asked to paint.
#[derive(Default)]
struct RecordingCanvas {
    frames: Vec<CanvasProps>,
}

impl Canvas for RecordingCanvas {
    fn paint(&mut self, props: &CanvasProps) {
        self.frames.push(props.clone());
    }
}

fn image() -> ImageId {
    ImageId::new("dog.jpg")
}

fn bbox(id: &str, label: &str, x: f32) -> AnnotationBox {
    AnnotationBox::with_id(BoxId::new(id), Rect::new(x, x, x + 20.0, x + 20.0), label)
}

fn collection(labels: &[&str], boxes: &[AnnotationBox]) -> Collection {
    let mut c = Collection::with_kind(CollectionKind::Localization);
    for label in labels {
        c.add_label(label);
    }
    c.images.push(image());
    for b in boxes {
        c.add_box(&image(), b.clone());
    }
    c
}

struct Fixture {
    hub: EventHub,
    panel: AnnotationPanel,
}

fn mount_with_focus(collection: Collection, focus: Rc<dyn FocusProbe>) -> Fixture {
    let hub = EventHub::new();
    let mut editor = EditorState::new();
    editor.select_image(image());
    let panel = AnnotationPanel::mount(
        &hub,
        focus,
        KeyBindings::default(),
        Palette::default(),
        editor.into_shared(),
        SyncDispatcher::new(collection).into_shared(),
    );
    Fixture { hub, panel }
}

fn mount(collection: Collection) -> Fixture {
    mount_with_focus(collection, Rc::new(NoTextFocus))
}

fn key_down(hub: &EventHub, c: char) {
    hub.emit(SessionEvent::KeyDown(KeyEvent::char(c)));
}

#[test]
fn test_draw_new_box_commits_create() {
    let f = mount(collection(&["cat"], &[]));
    f.panel.editor().borrow_mut().set_active_label("cat");

    let drawn = bbox("new", "cat", 5.0);
    f.panel
        .handle_canvas_event(CanvasEvent::Started(drawn.moved_to(Rect::at(5.0, 5.0))))
        .unwrap();
    f.panel
        .handle_canvas_event(CanvasEvent::Changed(drawn.clone()))
        .unwrap();
    let outcome = f
        .panel
        .handle_canvas_event(CanvasEvent::Finished(drawn.clone()))
        .unwrap();

    assert_eq!(outcome, Some(FinishOutcome::Created));
    let sync = f.panel.sync().borrow();
    assert_eq!(sync.collection().boxes(&image()), &[drawn]);
    assert_eq!(sync.pending_count(), 1);
    assert!(f.panel.editor().borrow().active_box().is_none());
}

#[test]
fn test_drag_renders_live_geometry_on_top() {
    let p = bbox("p", "cat", 0.0);
    let q = bbox("q", "cat", 100.0);
    let f = mount(collection(&["cat"], &[p.clone(), q.clone()]));

    let dragged = p.moved_to(Rect::new(40.0, 40.0, 60.0, 60.0));
    f.panel.on_box_started(p);
    f.panel.on_box_changed(dragged.clone());

    let mut canvas = RecordingCanvas::default();
    f.panel.render(&mut canvas);
    assert_eq!(canvas.frames[0].boxes, vec![dragged, q]);
}

#[test]
fn test_move_commits_delete_then_create() {
    let p = bbox("p", "cat", 0.0);
    let f = mount(collection(&["cat"], &[p.clone()]));

    let moved = p.moved_to(Rect::new(9.0, 9.0, 30.0, 30.0));
    f.panel.on_box_started(p.clone());
    let outcome = f.panel.on_box_finished(moved.clone()).unwrap();

    assert_eq!(outcome, FinishOutcome::Replaced { previous: p.clone() });
    let sync = f.panel.sync().borrow();
    let commits: Vec<_> = sync.pending().cloned().collect();
    assert_eq!(
        commits,
        vec![
            Commit::delete_box(&image(), p),
            Commit::create_box(&image(), moved.clone()),
        ]
    );
    assert_eq!(sync.collection().boxes(&image()), &[moved]);
}

#[test]
fn test_unknown_label_created_and_activated() {
    let f = mount(collection(&[], &[]));
    let label = f.panel.props().draw_label().to_string();
    assert_eq!(label, "Untitled Label");
    f.panel.on_box_finished(bbox("b", &label, 0.0)).unwrap();

    let editor = f.panel.editor().borrow();
    assert_eq!(editor.active_label.as_deref(), Some("Untitled Label"));
    let sync = f.panel.sync().borrow();
    let first = sync.pending().next().cloned();
    assert_eq!(first, Some(Commit::create_label("Untitled Label")));
}

#[test]
fn test_finish_without_image_is_error() {
    let hub = EventHub::new();
    let panel = AnnotationPanel::mount(
        &hub,
        Rc::new(NoTextFocus),
        KeyBindings::default(),
        Palette::default(),
        EditorState::new().into_shared(),
        SyncDispatcher::default().into_shared(),
    );
    assert_eq!(
        panel.on_box_finished(bbox("b", "cat", 0.0)),
        Err(EditError::NoImageSelected)
    );
    assert_eq!(panel.sync().borrow().pending_count(), 0);
}

#[test]
fn test_label_hotkeys_through_hub() {
    let f = mount(collection(&["a", "b", "c"], &[]));

    key_down(&f.hub, '2');
    assert_eq!(f.panel.editor().borrow().active_label.as_deref(), Some("b"));

    key_down(&f.hub, '9');
    assert_eq!(f.panel.editor().borrow().active_label.as_deref(), Some("b"));

    key_down(&f.hub, 'q');
    key_down(&f.hub, 'q');
    assert_eq!(f.panel.editor().borrow().active_label.as_deref(), Some("a"));
}

#[test]
fn test_hotkeys_ignored_while_typing() {
    let focus = Rc::new(FocusFlag::default());
    let f = mount_with_focus(collection(&["a", "b"], &[]), focus.clone());
    focus.set(true);

    key_down(&f.hub, '2');
    f.hub.emit(SessionEvent::KeyDown(KeyEvent::new(
        Key::Control,
        Modifiers::CTRL,
    )));

    assert!(f.panel.editor().borrow().active_label.is_none());
    assert_eq!(f.panel.effective_tool(), Tool::Draw);
}

#[test]
fn test_modifier_override_and_blur() {
    let f = mount(collection(&["a"], &[]));
    assert_eq!(f.panel.effective_tool(), Tool::Draw);
    assert!(f.panel.props().crosshair);

    f.hub.emit(SessionEvent::KeyDown(KeyEvent::new(
        Key::Meta,
        Modifiers::META,
    )));
    let props = f.panel.props();
    assert_eq!(props.mode, Tool::Move);
    assert!(!props.crosshair);

    f.hub.emit(SessionEvent::WindowBlur);
    assert_eq!(f.panel.effective_tool(), Tool::Draw);
}

#[test]
fn test_props_colors() {
    let f = mount(collection(&["a", "b", "c"], &[]));
    assert_eq!(f.panel.props().active_color, Color::neutral());

    f.panel.editor().borrow_mut().set_active_label("b");
    let props = f.panel.props();
    assert_eq!(props.active_color, unique_color(1, 3, &Palette::default()));
    assert_eq!(props.color_map.len(), 3);

    f.panel.editor().borrow_mut().set_active_label("ghost");
    assert_eq!(f.panel.props().active_color, Color::neutral());
}

#[test]
fn test_props_pass_hover_and_image() {
    let p = bbox("p", "a", 0.0);
    let f = mount(collection(&["a"], &[p.clone()]));
    f.panel
        .editor()
        .borrow_mut()
        .set_hovered(Some(p.id.clone()));

    let props = f.panel.props();
    assert_eq!(props.hovered, Some(p.id));
    assert_eq!(props.image, Some(image()));
    assert_eq!(props.boxes.len(), 1);
}

#[test]
fn test_unmount_detaches_listeners() {
    let f = mount(collection(&["a", "b"], &[]));
    assert_eq!(f.hub.listener_count(), 2);

    let editor = Rc::clone(f.panel.editor());
    f.panel.unmount();
    assert_eq!(f.hub.listener_count(), 0);

    key_down(&f.hub, '2');
    assert!(editor.borrow().active_label.is_none());
}

#[test]
fn test_commits_reach_remote_after_unmount() {
    let store = InMemoryStore::new();
    store.insert_bucket("bucket", collection(&["cat"], &[]));

    let f = mount(collection(&["cat"], &[]));
    f.panel.on_box_finished(bbox("b1", "cat", 0.0)).unwrap();
    f.panel.on_box_started(bbox("b1", "cat", 0.0));
    f.panel.on_box_finished(bbox("b1", "dog", 0.0)).unwrap();

    let sync = Rc::clone(f.panel.sync());
    f.panel.unmount();

    let report = sync.borrow_mut().pump(&store.remote("bucket"));
    assert!(report.is_clean());
    assert_eq!(report.forwarded, 4);

    let kinds: Vec<&str> = store
        .forwarded()
        .iter()
        .map(|(_, c)| match c {
            Commit::CreateLabel { .. } => "label",
            Commit::CreateBox { .. } => "create",
            Commit::DeleteBox { .. } => "delete",
        })
        .collect();
    assert_eq!(kinds, vec!["create", "label", "delete", "create"]);

    let remote_copy = store.bucket("bucket").unwrap();
    assert_eq!(remote_copy, sync.borrow().collection().clone());
}

#[test]
fn test_remote_failure_keeps_local_boxes() {
    let store = InMemoryStore::new();
    store.set_reject_commits(true);

    let f = mount(collection(&["cat"], &[]));
    f.panel.on_box_finished(bbox("b1", "cat", 0.0)).unwrap();
    let report = f.panel.sync().borrow_mut().pump(&store.remote("bucket"));

    assert_eq!(report.failed.len(), 1);
    assert_eq!(f.panel.sync().borrow().collection().boxes(&image()).len(), 1);
}

#[test]
fn test_from_config_uses_bindings() {
    let mut config = AppConfig::new();
    config.keybindings.cycle_label = Key::Char('w');
    config.preferences.default_tool = Tool::Move;

    let hub = EventHub::new();
    let mut editor = EditorState::with_tool(config.preferences.default_tool);
    editor.select_image(image());
    let panel = AnnotationPanel::from_config(
        &hub,
        Rc::new(NoTextFocus),
        &config,
        editor.into_shared(),
        SyncDispatcher::new(collection(&["a", "b"], &[])).into_shared(),
    );

    assert_eq!(panel.effective_tool(), Tool::Move);
    assert!(!panel.props().crosshair);

    key_down(&hub, 'q');
    assert!(panel.editor().borrow().active_label.is_none());
    key_down(&hub, 'w');
    assert_eq!(panel.editor().borrow().active_label.as_deref(), Some("a"));
}

/// Remote that refuses deletes and passes everything else to the store.
struct DeleteRefusingRemote(BucketRemote);

impl RemoteStore for DeleteRefusingRemote {
    fn forward(&self, commit: &Commit) -> Result<(), SyncError> {
        if matches!(commit, Commit::DeleteBox { .. }) {
            return Err(SyncError::Rejected {
                reason: "deletes disabled".to_string(),
            });
        }
        self.0.forward(commit)
    }
}

#[test]
fn test_refused_delete_leaves_single_remote_box() {
    let p = bbox("p", "cat", 0.0);
    let store = InMemoryStore::new();
    store.insert_bucket("bucket", collection(&["cat"], &[p.clone()]));

    let f = mount(collection(&["cat"], &[p.clone()]));
    f.panel.on_box_started(p.clone());
    f.panel
        .on_box_finished(p.moved_to(Rect::new(50.0, 50.0, 70.0, 70.0)))
        .unwrap();

    let remote = DeleteRefusingRemote(store.remote("bucket"));
    let report = f.panel.sync().borrow_mut().pump(&remote);
    assert_eq!(report.forwarded, 0);
    assert_eq!(report.failed.len(), 2);

    let remote_copy = store.bucket("bucket").unwrap();
    let with_id: Vec<_> = remote_copy
        .boxes(&image())
        .iter()
        .filter(|b| b.id == p.id)
        .collect();
    assert_eq!(with_id, vec![&p]);
}

#[test]
fn test_late_change_after_finish_does_not_revive_box() {
    let f = mount(collection(&["cat"], &[]));
    let drawn = bbox("d", "cat", 0.0);
    f.panel.on_box_started(drawn.clone());
    f.panel.on_box_finished(drawn.clone()).unwrap();
    f.panel
        .handle_canvas_event(CanvasEvent::Changed(drawn.moved_to(Rect::at(80.0, 80.0))))
        .unwrap();

    assert!(f.panel.editor().borrow().active_box().is_none());
    assert_eq!(f.panel.props().boxes, vec![drawn]);
}
