//! Error types for collection loading, synchronization and box edits.

use thiserror::Error;

/// Errors reported by a collection store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller lacks access to the bucket
    #[error("Forbidden")]
    Forbidden,

    /// Bucket does not exist at the requested location
    #[error("Bucket not found: {bucket}")]
    NotFound {
        /// The bucket that was requested
        bucket: String,
    },

    /// Any other store failure
    #[error("Store request failed: {message}")]
    Failed {
        /// Description of the failure
        message: String,
    },

    /// Collection payload could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a generic failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }
}

/// Errors from forwarding a commit to the remote store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote refused the commit
    #[error("Commit rejected: {reason}")]
    Rejected {
        /// Reason given by the remote
        reason: String,
    },

    /// The commit never reached the remote
    #[error("Transport error: {0}")]
    Transport(String),

    /// The commit was not sent because a commit it depends on failed
    #[error("Skipped: {0}")]
    Skipped(String),
}

/// Errors from finishing a box edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// No image is selected to attach the box to
    #[error("No image selected")]
    NoImageSelected,
}
