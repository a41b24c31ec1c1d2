//! Verification coordinator
//!
//! The only stateful logic in the broker: drives a claim from
//! requested, through pending, to linked, and back to unlinked.
//!
//! Per chat user the lifecycle is `UNLINKED -> PENDING -> LINKED`,
//! with `PENDING -> PENDING` on re-request (the new claim supersedes
//! the old one and its code) and `LINKED -> UNLINKED` on explicit
//! unlink. A link is only ever written from the oracle's confirmation
//! record; the claimed username and id staged at request time are
//! untrusted and never promoted directly.

use chrono::Utc;

use crate::code::generate_code;
use crate::error::LinkError;
use crate::resolver::{AccountResolver, ResolveError};
use crate::store::{
    LinkRecord, LinkStatus, LinkStore, LocalId, PendingVerification, VerificationStore,
};

impl From<ResolveError> for LinkError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound => LinkError::ExternalAccountNotFound,
            ResolveError::Unavailable(msg) => LinkError::ResolverUnavailable(msg),
        }
    }
}

/// Coordinates the request -> pending -> confirm -> linked transition.
///
/// All collaborators are injected handles; the coordinator holds no
/// state of its own beyond what the stores persist.
pub struct VerificationCoordinator<R, L, V> {
    resolver: R,
    links: L,
    verifications: V,
}

impl<R, L, V> VerificationCoordinator<R, L, V>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    pub fn new(resolver: R, links: L, verifications: V) -> Self {
        Self {
            resolver,
            links,
            verifications,
        }
    }

    /// Stage a link claim: resolve the claimed username, then upsert a
    /// pending row with a fresh one-time code.
    ///
    /// Resolver failures propagate without touching the stores. A
    /// repeated request replaces the previous claim, invalidating its
    /// code. The returned pending row carries the code the caller must
    /// relay to the user for in-game entry.
    pub async fn request_verification(
        &self,
        local_id: LocalId,
        claimed_username: &str,
    ) -> Result<PendingVerification, LinkError> {
        let account = self.resolver.resolve(claimed_username).await?;

        let pending = PendingVerification {
            local_id: local_id.clone(),
            claimed_id: account.id,
            claimed_username: account.username,
            code: generate_code(),
            created_at: Utc::now(),
        };
        self.verifications.put_pending(pending.clone())?;

        tracing::info!(
            local_id = %local_id.0,
            claimed_id = pending.claimed_id.0,
            "Verification requested"
        );

        Ok(pending)
    }

    /// Promote a confirmed claim into a link.
    ///
    /// Reads the oracle's confirmation record; if it is absent the
    /// claim is simply not confirmed yet and nothing changes. The link
    /// is written strictly from the confirmation record's fields.
    /// Idempotent: repeating the call re-applies the same link.
    pub fn complete_verification(&self, local_id: &LocalId) -> Result<LinkRecord, LinkError> {
        let confirmation = self
            .verifications
            .get_confirmation(local_id)?
            .ok_or(LinkError::NotYetConfirmed)?;

        let link = LinkRecord {
            local_id: confirmation.local_id,
            external_id: confirmation.external_id,
            external_username: confirmation.external_username,
            linked_at: confirmation.confirmed_at,
        };
        self.links.put_link(link.clone())?;

        // The claim is no longer in flight; the confirmation record
        // stays so repeated completion remains idempotent.
        self.verifications.delete_pending(local_id)?;

        tracing::info!(
            local_id = %link.local_id.0,
            external_id = link.external_id.0,
            external_username = %link.external_username,
            "Account linked"
        );

        Ok(link)
    }

    /// Remove a link, reporting whether one existed
    pub fn unlink(&self, local_id: &LocalId) -> Result<bool, LinkError> {
        let deleted = self.links.delete_link(local_id)?;
        if deleted {
            tracing::info!(local_id = %local_id.0, "Account unlinked");
        }
        Ok(deleted)
    }

    /// Find a link by its last-confirmed external username.
    /// Exact match, case-sensitive.
    pub fn lookup_by_username(&self, username: &str) -> Result<Option<LinkRecord>, LinkError> {
        self.links.find_by_username(username)
    }

    /// List every confirmed link
    pub fn list_all(&self) -> Result<Vec<LinkRecord>, LinkError> {
        self.links.list_links()
    }

    /// Where a chat user currently sits in the lifecycle
    pub fn status(&self, local_id: &LocalId) -> Result<LinkStatus, LinkError> {
        if let Some(link) = self.links.get_link(local_id)? {
            return Ok(LinkStatus::Linked(link));
        }
        if self.verifications.get_pending(local_id)?.is_some() {
            return Ok(LinkStatus::Pending);
        }
        Ok(LinkStatus::Unlinked)
    }
}
