//! Storage abstractions for the broker

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemoryLinkStore, InMemoryVerificationStore};
pub use models::*;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use crate::error::LinkError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, LinkError>;

/// Confirmed-link storage, keyed uniquely by [`LocalId`].
///
/// All writes are single-row upserts or deletes; a row is never
/// partially applied.
pub trait LinkStore: Send + Sync {
    /// Insert or replace the link for this record's local id
    fn put_link(&self, link: LinkRecord) -> StoreResult<()>;

    /// Get the link for a local id
    fn get_link(&self, local_id: &LocalId) -> StoreResult<Option<LinkRecord>>;

    /// Delete the link for a local id, reporting whether a row existed
    fn delete_link(&self, local_id: &LocalId) -> StoreResult<bool>;

    /// Find a link by its last-confirmed external username (exact match)
    fn find_by_username(&self, username: &str) -> StoreResult<Option<LinkRecord>>;

    /// List every confirmed link
    fn list_links(&self) -> StoreResult<Vec<LinkRecord>>;
}

/// Storage for in-flight claims and oracle confirmations, keyed
/// uniquely by [`LocalId`].
pub trait VerificationStore: Send + Sync {
    /// Insert or replace the pending claim for this record's local id,
    /// superseding any earlier claim and its code
    fn put_pending(&self, pending: PendingVerification) -> StoreResult<()>;

    /// Get the pending claim for a local id
    fn get_pending(&self, local_id: &LocalId) -> StoreResult<Option<PendingVerification>>;

    /// Delete the pending claim for a local id
    fn delete_pending(&self, local_id: &LocalId) -> StoreResult<()>;

    /// Insert or replace the oracle's confirmation for a local id
    fn put_confirmation(&self, confirmation: ConfirmationRecord) -> StoreResult<()>;

    /// Get the confirmation for a local id
    fn get_confirmation(&self, local_id: &LocalId) -> StoreResult<Option<ConfirmationRecord>>;
}

// Shared handles: the two routers hold the same underlying store.
impl<T: LinkStore + ?Sized> LinkStore for Arc<T> {
    fn put_link(&self, link: LinkRecord) -> StoreResult<()> {
        (**self).put_link(link)
    }

    fn get_link(&self, local_id: &LocalId) -> StoreResult<Option<LinkRecord>> {
        (**self).get_link(local_id)
    }

    fn delete_link(&self, local_id: &LocalId) -> StoreResult<bool> {
        (**self).delete_link(local_id)
    }

    fn find_by_username(&self, username: &str) -> StoreResult<Option<LinkRecord>> {
        (**self).find_by_username(username)
    }

    fn list_links(&self) -> StoreResult<Vec<LinkRecord>> {
        (**self).list_links()
    }
}

impl<T: VerificationStore + ?Sized> VerificationStore for Arc<T> {
    fn put_pending(&self, pending: PendingVerification) -> StoreResult<()> {
        (**self).put_pending(pending)
    }

    fn get_pending(&self, local_id: &LocalId) -> StoreResult<Option<PendingVerification>> {
        (**self).get_pending(local_id)
    }

    fn delete_pending(&self, local_id: &LocalId) -> StoreResult<()> {
        (**self).delete_pending(local_id)
    }

    fn put_confirmation(&self, confirmation: ConfirmationRecord) -> StoreResult<()> {
        (**self).put_confirmation(confirmation)
    }

    fn get_confirmation(&self, local_id: &LocalId) -> StoreResult<Option<ConfirmationRecord>> {
        (**self).get_confirmation(local_id)
    }
}
