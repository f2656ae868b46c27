//! Optimistic commit dispatcher.
//!
//! Every dispatched commit is applied to the local collection immediately and
//! appended to an outbox. The host drains the outbox into a [`RemoteStore`]
//! on its own tick with [`SyncDispatcher::pump`], so local state never waits
//! on the remote round-trip.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::commit::Commit;
use crate::error::SyncError;
use crate::model::{AnnotationBox, Collection, ImageId};
use crate::store::RemoteStore;

/// Dispatcher shared between the panel and the host loop.
pub type SharedSync = Rc<RefCell<SyncDispatcher>>;

/// Result of forwarding the outbox once.
#[derive(Debug, Default)]
pub struct PumpReport {
    /// Commits the remote accepted
    pub forwarded: usize,
    /// Commits the remote refused or never received
    pub failed: Vec<(Commit, SyncError)>,
}

impl PumpReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Local collection state plus the queue of commits awaiting the remote.
#[derive(Debug, Default)]
pub struct SyncDispatcher {
    collection: Collection,
    outbox: VecDeque<Commit>,
    dispatched: usize,
}

impl SyncDispatcher {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            ..Self::default()
        }
    }

    pub fn into_shared(self) -> SharedSync {
        Rc::new(RefCell::new(self))
    }

    /// The local, optimistically updated collection.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Swap in a freshly loaded collection. Queued commits are kept.
    pub fn replace_collection(&mut self, collection: Collection) {
        self.collection = collection;
    }

    /// Apply a commit locally and queue it for the remote.
    pub fn dispatch(&mut self, commit: Commit) {
        if !commit.apply(&mut self.collection) {
            log::debug!("{} changed nothing locally", commit.description());
        }
        log::debug!("Dispatched: {}", commit.description());
        self.dispatched += 1;
        self.outbox.push_back(commit);
    }

    pub fn create_label(&mut self, name: &str) {
        self.dispatch(Commit::create_label(name));
    }

    pub fn create_box(&mut self, image: &ImageId, annotation: AnnotationBox) {
        self.dispatch(Commit::create_box(image, annotation));
    }

    pub fn delete_box(&mut self, image: &ImageId, annotation: AnnotationBox) {
        self.dispatch(Commit::delete_box(image, annotation));
    }

    /// Commits not yet forwarded, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Commit> {
        self.outbox.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.outbox.len()
    }

    /// Total commits dispatched since creation.
    pub fn dispatched_count(&self) -> usize {
        self.dispatched
    }

    /// Forward every queued commit in dispatch order.
    ///
    /// Failed commits are reported and dropped; local state is left as is.
    /// When a `DeleteBox` fails, the `CreateBox` re-adding the same box right
    /// after it is dropped too, so the remote keeps the old box instead of
    /// holding two boxes with one id.
    pub fn pump(&mut self, remote: &dyn RemoteStore) -> PumpReport {
        let mut report = PumpReport::default();
        let mut failed_delete: Option<Commit> = None;
        while let Some(commit) = self.outbox.pop_front() {
            if let Some(delete) = failed_delete.take() {
                if commit.recreates(&delete) {
                    log::warn!("Skipping {}: paired delete failed", commit.description());
                    let reason = format!("{} failed", delete.description());
                    report.failed.push((commit, SyncError::Skipped(reason)));
                    continue;
                }
            }
            match remote.forward(&commit) {
                Ok(()) => {
                    log::trace!("Forwarded: {}", commit.description());
                    report.forwarded += 1;
                }
                Err(e) => {
                    log::warn!("Remote sync failed for {}: {}", commit.description(), e);
                    if matches!(commit, Commit::DeleteBox { .. }) {
                        failed_delete = Some(commit.clone());
                    }
                    report.failed.push((commit, e));
                }
            }
        }
        if report.forwarded > 0 || !report.failed.is_empty() {
            log::debug!(
                "Sync pump: {} forwarded, {} failed",
                report.forwarded,
                report.failed.len()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxId, Rect};

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<Commit>>,
        reject_labels: bool,
        reject_deletes: bool,
    }

    impl RemoteStore for Recorder {
        fn forward(&self, commit: &Commit) -> Result<(), SyncError> {
            if self.reject_labels && matches!(commit, Commit::CreateLabel { .. }) {
                return Err(SyncError::Rejected {
                    reason: "read-only".to_string(),
                });
            }
            if self.reject_deletes && matches!(commit, Commit::DeleteBox { .. }) {
                return Err(SyncError::Transport("connection reset".to_string()));
            }
            self.seen.borrow_mut().push(commit.clone());
            Ok(())
        }
    }

    fn sample(id: &str) -> AnnotationBox {
        AnnotationBox::with_id(BoxId::new(id), Rect::new(0.0, 0.0, 1.0, 1.0), "cat")
    }

    #[test]
    fn test_dispatch_applies_before_pump() {
        let img = ImageId::new("a.jpg");
        let mut sync = SyncDispatcher::default();
        sync.create_label("cat");
        sync.create_box(&img, sample("1"));

        assert!(sync.collection().labels.contains("cat"));
        assert_eq!(sync.collection().boxes(&img).len(), 1);
        assert_eq!(sync.pending_count(), 2);
    }

    #[test]
    fn test_pump_preserves_order() {
        let img = ImageId::new("a.jpg");
        let mut sync = SyncDispatcher::default();
        sync.create_box(&img, sample("1"));
        sync.delete_box(&img, sample("1"));
        sync.create_box(&img, sample("1"));

        let remote = Recorder::default();
        let report = sync.pump(&remote);
        assert_eq!(report.forwarded, 3);
        assert_eq!(sync.pending_count(), 0);

        let seen = remote.seen.borrow();
        assert!(matches!(seen[0], Commit::CreateBox { .. }));
        assert!(matches!(seen[1], Commit::DeleteBox { .. }));
        assert!(matches!(seen[2], Commit::CreateBox { .. }));
    }

    #[test]
    fn test_failure_keeps_local_state() {
        let mut sync = SyncDispatcher::default();
        sync.create_label("cat");
        let remote = Recorder {
            reject_labels: true,
            ..Recorder::default()
        };
        let report = sync.pump(&remote);

        assert!(!report.is_clean());
        assert_eq!(report.failed.len(), 1);
        assert!(sync.collection().labels.contains("cat"));
        assert_eq!(sync.pending_count(), 0);
    }

    #[test]
    fn test_failed_delete_skips_paired_create() {
        let img = ImageId::new("a.jpg");
        let mut sync = SyncDispatcher::default();
        sync.delete_box(&img, sample("1"));
        sync.create_box(&img, sample("1"));
        sync.create_box(&img, sample("2"));

        let remote = Recorder {
            reject_deletes: true,
            ..Recorder::default()
        };
        let report = sync.pump(&remote);

        assert_eq!(report.forwarded, 1);
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[1].1, SyncError::Skipped(_)));
        let seen = remote.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(matches!(&seen[0], Commit::CreateBox { annotation, .. } if annotation.id == BoxId::new("2")));
    }

    #[test]
    fn test_failed_delete_of_other_box_keeps_create() {
        let img = ImageId::new("a.jpg");
        let mut sync = SyncDispatcher::default();
        sync.delete_box(&img, sample("1"));
        sync.create_box(&img, sample("2"));

        let remote = Recorder {
            reject_deletes: true,
            ..Recorder::default()
        };
        let report = sync.pump(&remote);
        assert_eq!(report.forwarded, 1);
        assert_eq!(report.failed.len(), 1);
    }

    #[test]
    fn test_replace_collection_keeps_outbox() {
        let mut sync = SyncDispatcher::default();
        sync.create_label("cat");
        sync.replace_collection(Collection::new());
        assert_eq!(sync.pending_count(), 1);
        assert_eq!(sync.dispatched_count(), 1);
    }
}
