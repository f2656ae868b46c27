//! Collaborator traits for the remote collection store.
//!
//! The engine only needs three things from a backend: loading a collection,
//! locating a bucket that is not where the caller looked, and accepting
//! forwarded commits. Transport and wire format belong to the implementor.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, SyncError};
use crate::model::Collection;
use crate::sync::Commit;

/// Where the host should navigate to find a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub bucket: String,
    pub location: String,
}

/// Read side of a collection store.
pub trait CollectionStore {
    /// Load the collection of `bucket`, optionally at a known location.
    ///
    /// Returns [`StoreError::Forbidden`] when the caller lacks access.
    fn load_collection(&self, bucket: &str, location: Option<&str>)
    -> Result<Collection, StoreError>;

    /// Find the location a bucket actually lives at.
    fn locate(&self, bucket: &str) -> Result<Redirect, StoreError>;
}

/// Write side of a collection store.
///
/// Implementations may block, or hand the commit to an async task and
/// return at once; the dispatcher only relies on calls arriving in order.
pub trait RemoteStore {
    fn forward(&self, commit: &Commit) -> Result<(), SyncError>;
}
