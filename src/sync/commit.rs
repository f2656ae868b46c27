//! Commit kinds of the sync protocol.

use serde::{Deserialize, Serialize};

use crate::model::{AnnotationBox, Collection, ImageId};

/// A durable mutation of a collection.
///
/// Box edits have no update commit: a changed box is a `DeleteBox` of the old
/// box followed by a `CreateBox` of the new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Commit {
    CreateLabel {
        name: String,
    },
    CreateBox {
        image: ImageId,
        #[serde(rename = "box")]
        annotation: AnnotationBox,
    },
    DeleteBox {
        image: ImageId,
        #[serde(rename = "box")]
        annotation: AnnotationBox,
    },
}

impl Commit {
    pub fn create_label(name: impl Into<String>) -> Self {
        Commit::CreateLabel { name: name.into() }
    }

    pub fn create_box(image: &ImageId, annotation: AnnotationBox) -> Self {
        Commit::CreateBox {
            image: image.clone(),
            annotation,
        }
    }

    pub fn delete_box(image: &ImageId, annotation: AnnotationBox) -> Self {
        Commit::DeleteBox {
            image: image.clone(),
            annotation,
        }
    }

    /// Get a human-readable description of this commit
    pub fn description(&self) -> String {
        match self {
            Commit::CreateLabel { name } => format!("Create label '{}'", name),
            Commit::CreateBox { image, annotation } => {
                format!("Create box {} on {}", annotation.id, image)
            }
            Commit::DeleteBox { image, annotation } => {
                format!("Delete box {} on {}", annotation.id, image)
            }
        }
    }

    /// Whether this is the `CreateBox` half of an edit whose `DeleteBox` is `delete`.
    pub fn recreates(&self, delete: &Commit) -> bool {
        match (self, delete) {
            (
                Commit::CreateBox { image, annotation },
                Commit::DeleteBox {
                    image: deleted_image,
                    annotation: deleted,
                },
            ) => image == deleted_image && annotation.id == deleted.id,
            _ => false,
        }
    }

    /// Apply this commit to a collection.
    ///
    /// Returns `false` when the commit had nothing to change (label already
    /// present, box already gone).
    pub fn apply(&self, collection: &mut Collection) -> bool {
        match self {
            Commit::CreateLabel { name } => collection.add_label(name),
            Commit::CreateBox { image, annotation } => {
                collection.add_box(image, annotation.clone());
                true
            }
            Commit::DeleteBox { image, annotation } => {
                collection.remove_box(image, &annotation.id).is_some()
            }
        }
    }
}
