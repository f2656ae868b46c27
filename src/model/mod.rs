//! Data models for the annotation engine.

mod annotation;
mod collection;
mod label;

pub use annotation::{AnnotationBox, BoxId, ImageId, Rect, Tool};
pub use collection::{Collection, CollectionKind};
pub use label::LabelSet;
