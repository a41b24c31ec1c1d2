//! In-memory storage implementations

use std::collections::HashMap;
use std::sync::RwLock;

use super::{
    ConfirmationRecord, LinkRecord, LinkStore, LocalId, PendingVerification, StoreResult,
    VerificationStore,
};

/// In-memory link store
pub struct InMemoryLinkStore {
    links: RwLock<HashMap<LocalId, LinkRecord>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkStore for InMemoryLinkStore {
    fn put_link(&self, link: LinkRecord) -> StoreResult<()> {
        self.links
            .write()
            .unwrap()
            .insert(link.local_id.clone(), link);
        Ok(())
    }

    fn get_link(&self, local_id: &LocalId) -> StoreResult<Option<LinkRecord>> {
        Ok(self.links.read().unwrap().get(local_id).cloned())
    }

    fn delete_link(&self, local_id: &LocalId) -> StoreResult<bool> {
        Ok(self.links.write().unwrap().remove(local_id).is_some())
    }

    fn find_by_username(&self, username: &str) -> StoreResult<Option<LinkRecord>> {
        // Exact match, case-sensitive: usernames are stored as confirmed
        let links = self.links.read().unwrap();
        Ok(links
            .values()
            .find(|l| l.external_username == username)
            .cloned())
    }

    fn list_links(&self) -> StoreResult<Vec<LinkRecord>> {
        Ok(self.links.read().unwrap().values().cloned().collect())
    }
}

/// In-memory verification store
pub struct InMemoryVerificationStore {
    pending: RwLock<HashMap<LocalId, PendingVerification>>,
    confirmations: RwLock<HashMap<LocalId, ConfirmationRecord>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
            confirmations: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryVerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationStore for InMemoryVerificationStore {
    fn put_pending(&self, pending: PendingVerification) -> StoreResult<()> {
        self.pending
            .write()
            .unwrap()
            .insert(pending.local_id.clone(), pending);
        Ok(())
    }

    fn get_pending(&self, local_id: &LocalId) -> StoreResult<Option<PendingVerification>> {
        Ok(self.pending.read().unwrap().get(local_id).cloned())
    }

    fn delete_pending(&self, local_id: &LocalId) -> StoreResult<()> {
        self.pending.write().unwrap().remove(local_id);
        Ok(())
    }

    fn put_confirmation(&self, confirmation: ConfirmationRecord) -> StoreResult<()> {
        self.confirmations
            .write()
            .unwrap()
            .insert(confirmation.local_id.clone(), confirmation);
        Ok(())
    }

    fn get_confirmation(&self, local_id: &LocalId) -> StoreResult<Option<ConfirmationRecord>> {
        Ok(self.confirmations.read().unwrap().get(local_id).cloned())
    }
}
