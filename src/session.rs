//! Box edit state machine.
//!
//! A session is either idle or holds the one box currently being drawn or
//! dragged. Finishing the edit turns it into commits:
//!
//! 1. create the box's label if the label set lacks it,
//! 2. delete the committed box with the same id, if any,
//! 3. create the finished box.
//!
//! The delete always precedes the create, so a consumer replaying commits in
//! order never sees two committed boxes sharing an id.

use crate::error::EditError;
use crate::model::{AnnotationBox, ImageId};
use crate::sync::SyncDispatcher;

/// Phase of the current edit cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditPhase {
    /// No box is being edited.
    #[default]
    Idle,
    /// A box is being drawn or dragged; holds its live geometry.
    Active(AnnotationBox),
}

/// How a finished edit was committed.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// A new box was created
    Created,
    /// An existing box was deleted and recreated with new geometry or label
    Replaced { previous: AnnotationBox },
}

/// The box edit state machine.
#[derive(Debug, Clone, Default)]
pub struct BoxEditSession {
    phase: EditPhase,
}

impl BoxEditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &EditPhase {
        &self.phase
    }

    /// The box being edited, if any.
    pub fn active_box(&self) -> Option<&AnnotationBox> {
        match &self.phase {
            EditPhase::Idle => None,
            EditPhase::Active(bbox) => Some(bbox),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, EditPhase::Active(_))
    }

    /// Begin an edit. A still-active box is replaced.
    pub fn start(&mut self, bbox: AnnotationBox) {
        if let EditPhase::Active(previous) = &self.phase {
            log::debug!("Edit of box {} superseded by {}", previous.id, bbox.id);
        }
        log::debug!("Edit started: box {} ({})", bbox.id, bbox.label);
        self.phase = EditPhase::Active(bbox);
    }

    /// Replace the live geometry and label of the edited box.
    ///
    /// The active box keeps the id it was started with. Updates arriving
    /// while idle (a late pointer move after release) are dropped.
    pub fn update(&mut self, bbox: AnnotationBox) {
        let EditPhase::Active(active) = &mut self.phase else {
            log::debug!("Ignoring update for box {} while idle", bbox.id);
            return;
        };
        if bbox.id != active.id {
            log::debug!("Update for box {} applied to active box {}", bbox.id, active.id);
        }
        log::trace!("Edit update: box {} {:?}", active.id, bbox.rect);
        active.rect = bbox.rect;
        active.label = bbox.label;
    }

    /// Commit the finished box and return to idle.
    ///
    /// `active_label` is switched to the box's label when that label had to
    /// be created. Without a selected image nothing is committed.
    pub fn finish(
        &mut self,
        bbox: AnnotationBox,
        image: Option<&ImageId>,
        sync: &mut SyncDispatcher,
        active_label: &mut Option<String>,
    ) -> Result<FinishOutcome, EditError> {
        self.phase = EditPhase::Idle;
        let image = image.ok_or(EditError::NoImageSelected)?;

        if !sync.collection().labels.contains(&bbox.label) {
            sync.create_label(&bbox.label);
            *active_label = Some(bbox.label.clone());
        }

        let previous = sync.collection().find_box(image, &bbox.id).cloned();
        let outcome = match previous {
            Some(previous) => {
                sync.delete_box(image, previous.clone());
                sync.create_box(image, bbox);
                FinishOutcome::Replaced { previous }
            }
            None => {
                sync.create_box(image, bbox);
                FinishOutcome::Created
            }
        };
        log::debug!("Edit finished on {}: {:?}", image, outcome);
        Ok(outcome)
    }
}

/// Boxes in paint order for an in-progress edit.
///
/// The committed entry sharing the active box's id is dropped and the active
/// box is put first, so the live geometry paints instead of the stale one.
pub fn merge_render_list(
    committed: &[AnnotationBox],
    active: Option<&AnnotationBox>,
) -> Vec<AnnotationBox> {
    match active {
        None => committed.to_vec(),
        Some(active) => std::iter::once(active.clone())
            .chain(committed.iter().filter(|b| b.id != active.id).cloned())
            .collect(),
    }
}
