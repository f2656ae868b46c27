//! boxlabel - bounding-box annotation engine
//!
//! The interaction core of an image annotation panel: modifier-driven tool
//! override, label hotkeys, the box edit lifecycle, per-label colors and
//! optimistic sync of commits to a remote bucket.

mod color_utils;
mod config;
mod constants;
mod editor;
mod error;
mod event;
mod input_mode;
mod keybindings;
mod label_cycler;
mod loader;
mod logging;
mod model;
mod panel;
mod session;
mod store;
mod sync;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color_utils::{Color, ColorMap, Palette, hsl_to_rgb, unique_color, unique_hue};
pub use config::{AppConfig, ConfigError, KeyBindingsConfig, LogLevel, UserPreferences};
pub use editor::{EditorState, SharedEditor};
pub use error::{EditError, StoreError, SyncError};
pub use event::{
    EventHub, FocusFlag, FocusProbe, Key, KeyEvent, Modifiers, NoTextFocus, SessionEvent,
    Subscription,
};
pub use input_mode::{InputModeResolver, MountedInputMode};
pub use keybindings::{KeyBindings, key_to_string};
pub use label_cycler::LabelCycler;
pub use loader::{LoadOutcome, open_collection};
pub use logging::init as init_logging;
pub use model::{AnnotationBox, BoxId, Collection, CollectionKind, ImageId, LabelSet, Rect, Tool};
pub use panel::{AnnotationPanel, Canvas, CanvasEvent, CanvasProps};
pub use session::{BoxEditSession, EditPhase, FinishOutcome, merge_render_list};
pub use store::memory::{BucketRemote, InMemoryStore};
pub use store::{CollectionStore, Redirect, RemoteStore};
pub use sync::{Commit, PumpReport, SharedSync, SyncDispatcher};
