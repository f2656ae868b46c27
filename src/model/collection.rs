//! Collection data model: labels, images and their committed boxes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationBox, BoxId, ImageId};
use super::label::LabelSet;

/// Kind of annotation a collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Bounding boxes over images
    Localization,
    /// Whole-image labels
    Classification,
}

/// A bucket's annotation state as seen by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unset until the user chooses a kind for a fresh bucket
    #[serde(default, rename = "type")]
    pub kind: Option<CollectionKind>,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default)]
    pub images: Vec<ImageId>,
    /// Committed boxes per image, in render order
    #[serde(default)]
    pub annotations: HashMap<ImageId, Vec<AnnotationBox>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: CollectionKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Committed boxes for an image (empty if the image has none).
    pub fn boxes(&self, image: &ImageId) -> &[AnnotationBox] {
        self.annotations
            .get(image)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_box(&self, image: &ImageId, id: &BoxId) -> Option<&AnnotationBox> {
        self.boxes(image).iter().find(|b| &b.id == id)
    }

    /// Append a label. Returns `false` if it already exists.
    pub fn add_label(&mut self, name: &str) -> bool {
        self.labels.insert(name)
    }

    /// Append a box to the image's sequence.
    pub fn add_box(&mut self, image: &ImageId, annotation: AnnotationBox) {
        self.annotations
            .entry(image.clone())
            .or_default()
            .push(annotation);
    }

    /// Remove the box with `id` from the image's sequence.
    pub fn remove_box(&mut self, image: &ImageId, id: &BoxId) -> Option<AnnotationBox> {
        let boxes = self.annotations.get_mut(image)?;
        let index = boxes.iter().position(|b| &b.id == id)?;
        Some(boxes.remove(index))
    }

    pub fn box_count(&self) -> usize {
        self.annotations.values().map(Vec::len).sum()
    }
}
