//! Opening a bucket's collection.
//!
//! Access denial sends the user to log in. Any other failure usually means
//! the bucket lives somewhere other than where we looked, so the store is
//! asked to locate it and the host is told where to go.

use crate::error::StoreError;
use crate::model::Collection;
use crate::store::{CollectionStore, Redirect};

/// What the host should do after trying to open a bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The collection is ready to edit
    Loaded(Collection),
    /// The caller lacks access and must log in
    RedirectToLogin,
    /// The bucket lives elsewhere
    Relocate(Redirect),
}

/// Load `bucket`, falling back to location discovery on non-access errors.
///
/// Returns an error only when locating the bucket fails as well.
pub fn open_collection(
    store: &dyn CollectionStore,
    bucket: &str,
    location: Option<&str>,
) -> Result<LoadOutcome, StoreError> {
    match store.load_collection(bucket, location) {
        Ok(collection) => {
            log::info!(
                "Loaded bucket '{}': {} labels, {} boxes",
                bucket,
                collection.labels.len(),
                collection.box_count()
            );
            Ok(LoadOutcome::Loaded(collection))
        }
        Err(StoreError::Forbidden) => {
            log::info!("Access to bucket '{}' denied, redirecting to login", bucket);
            Ok(LoadOutcome::RedirectToLogin)
        }
        Err(e) => {
            log::warn!("Failed to load bucket '{}': {}", bucket, e);
            let redirect = store.locate(bucket)?;
            log::info!("Bucket '{}' located at '{}'", bucket, redirect.location);
            Ok(LoadOutcome::Relocate(redirect))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CollectionKind;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn test_loaded() {
        let store = InMemoryStore::new();
        store.insert_bucket("b", Collection::with_kind(CollectionKind::Localization));
        match open_collection(&store, "b", None).unwrap() {
            LoadOutcome::Loaded(c) => assert_eq!(c.kind, Some(CollectionKind::Localization)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_forbidden_redirects_to_login() {
        let store = InMemoryStore::new();
        store.insert_bucket("b", Collection::new());
        store.forbid("b");
        store.set_location("b", "us-east");
        assert_eq!(
            open_collection(&store, "b", None).unwrap(),
            LoadOutcome::RedirectToLogin
        );
    }

    #[test]
    fn test_wrong_location_relocates() {
        let store = InMemoryStore::new();
        store.insert_bucket("b", Collection::new());
        store.set_location("b", "eu-de");
        assert_eq!(
            open_collection(&store, "b", Some("us-south")).unwrap(),
            LoadOutcome::Relocate(Redirect {
                bucket: "b".to_string(),
                location: "eu-de".to_string(),
            })
        );
    }

    #[test]
    fn test_unlocatable_bucket_errors() {
        let store = InMemoryStore::new();
        assert!(matches!(
            open_collection(&store, "ghost", None),
            Err(StoreError::NotFound { .. })
        ));
    }
}
