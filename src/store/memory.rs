//! In-process collection store.
//!
//! Holds bucket collections in memory, applies forwarded commits to its own
//! copy, and can be told to deny access or reject commits. Used by tests and
//! by hosts that run without a backend.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{CollectionStore, Redirect, RemoteStore};
use crate::error::{StoreError, SyncError};
use crate::model::Collection;
use crate::sync::Commit;

#[derive(Debug, Default)]
struct Inner {
    buckets: HashMap<String, Collection>,
    locations: HashMap<String, String>,
    forbidden: HashSet<String>,
    reject_commits: bool,
    forwarded: Vec<(String, Commit)>,
}

/// A shared handle to an in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a bucket's collection.
    pub fn insert_bucket(&self, bucket: &str, collection: Collection) {
        self.inner
            .borrow_mut()
            .buckets
            .insert(bucket.to_string(), collection);
    }

    /// Record the location a bucket lives at. Loads with a different
    /// location hint fail.
    pub fn set_location(&self, bucket: &str, location: &str) {
        self.inner
            .borrow_mut()
            .locations
            .insert(bucket.to_string(), location.to_string());
    }

    /// Deny access to a bucket.
    pub fn forbid(&self, bucket: &str) {
        self.inner.borrow_mut().forbidden.insert(bucket.to_string());
    }

    /// Make every forwarded commit fail.
    pub fn set_reject_commits(&self, reject: bool) {
        self.inner.borrow_mut().reject_commits = reject;
    }

    /// The store's own copy of a bucket.
    pub fn bucket(&self, bucket: &str) -> Option<Collection> {
        self.inner.borrow().buckets.get(bucket).cloned()
    }

    /// Commits accepted so far, in arrival order.
    pub fn forwarded(&self) -> Vec<(String, Commit)> {
        self.inner.borrow().forwarded.clone()
    }

    /// Remote endpoint that forwards commits into `bucket`.
    pub fn remote(&self, bucket: &str) -> BucketRemote {
        BucketRemote {
            store: self.clone(),
            bucket: bucket.to_string(),
        }
    }

    /// Serialize a bucket's collection to JSON.
    pub fn export_json(&self, bucket: &str) -> Result<String, StoreError> {
        let inner = self.inner.borrow();
        let collection = inner.buckets.get(bucket).ok_or_else(|| StoreError::NotFound {
            bucket: bucket.to_string(),
        })?;
        Ok(serde_json::to_string_pretty(collection)?)
    }

    /// Replace a bucket's collection with one parsed from JSON.
    pub fn import_json(&self, bucket: &str, json: &str) -> Result<(), StoreError> {
        let collection: Collection = serde_json::from_str(json)?;
        self.insert_bucket(bucket, collection);
        Ok(())
    }
}

impl CollectionStore for InMemoryStore {
    fn load_collection(
        &self,
        bucket: &str,
        location: Option<&str>,
    ) -> Result<Collection, StoreError> {
        let inner = self.inner.borrow();
        if inner.forbidden.contains(bucket) {
            return Err(StoreError::Forbidden);
        }
        let actual = inner.locations.get(bucket).map(String::as_str);
        if let Some((hint, _)) = location.zip(actual).filter(|(hint, actual)| hint != actual) {
            return Err(StoreError::failed(format!(
                "bucket '{}' is not at location '{}'",
                bucket, hint
            )));
        }
        inner
            .buckets
            .get(bucket)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
            })
    }

    fn locate(&self, bucket: &str) -> Result<Redirect, StoreError> {
        let inner = self.inner.borrow();
        inner
            .locations
            .get(bucket)
            .map(|location| Redirect {
                bucket: bucket.to_string(),
                location: location.clone(),
            })
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
            })
    }
}

/// [`RemoteStore`] bound to one bucket of an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct BucketRemote {
    store: InMemoryStore,
    bucket: String,
}

impl RemoteStore for BucketRemote {
    fn forward(&self, commit: &Commit) -> Result<(), SyncError> {
        let mut inner = self.store.inner.borrow_mut();
        if inner.reject_commits {
            return Err(SyncError::Rejected {
                reason: "store is rejecting commits".to_string(),
            });
        }
        let collection = inner.buckets.entry(self.bucket.clone()).or_default();
        commit.apply(collection);
        inner.forwarded.push((self.bucket.clone(), commit.clone()));
        Ok(())
    }
}
