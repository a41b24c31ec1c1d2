//! Data models for link and verification storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for a user on the chat platform.
///
/// Opaque to this service; it is whatever the chat gateway hands us
/// and is the primary key across every table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalId(pub String);

/// Stable identifier for an account on the game platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalId(pub u64);

/// A resolved game-platform account.
///
/// The username is a display string only; it can be renamed or reused
/// over time. Only `id` is safe to key on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAccount {
    pub id: ExternalId,
    pub username: String,
}

/// A confirmed, active link between a chat user and a game account.
///
/// Zero or one per `LocalId`. Created only from a [`ConfirmationRecord`],
/// never from an unauthenticated claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub local_id: LocalId,
    pub external_id: ExternalId,
    pub external_username: String,
    pub linked_at: DateTime<Utc>,
}

/// An outstanding, unconfirmed link claim.
///
/// Zero or one per `LocalId`; a new request replaces the previous row,
/// invalidating its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingVerification {
    pub local_id: LocalId,
    pub claimed_id: ExternalId,
    pub claimed_username: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Proof written by the confirmation oracle once it has observed the
/// correct code entered in-game by the claimed account.
///
/// This is the only record trusted when promoting a claim to a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    pub local_id: LocalId,
    pub external_id: ExternalId,
    pub external_username: String,
    pub confirmed_at: DateTime<Utc>,
}

/// Snapshot of where a chat user sits in the linking lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkStatus {
    Linked(LinkRecord),
    Pending,
    Unlinked,
}
