//! Application state for the two HTTP surfaces
//!
//! The command surface and the confirmation intake run as independent
//! services; the only thing they share is the verification store.

use crate::coordinator::VerificationCoordinator;
use crate::resolver::AccountResolver;
use crate::store::{LinkStore, VerificationStore};

/// State for the command/admin surface
pub struct AppState<R, L, V> {
    pub coordinator: VerificationCoordinator<R, L, V>,
    /// Bearer token for admin operations; empty disables them
    pub admin_token: String,
}

impl<R, L, V> AppState<R, L, V>
where
    R: AccountResolver,
    L: LinkStore,
    V: VerificationStore,
{
    pub fn new(coordinator: VerificationCoordinator<R, L, V>, admin_token: String) -> Self {
        Self {
            coordinator,
            admin_token,
        }
    }
}

/// State for the confirmation intake surface
pub struct IntakeState<V> {
    pub verifications: V,
    /// Bearer token the oracle must present; empty disables intake
    pub intake_token: String,
}

impl<V: VerificationStore> IntakeState<V> {
    pub fn new(verifications: V, intake_token: String) -> Self {
        Self {
            verifications,
            intake_token,
        }
    }
}
