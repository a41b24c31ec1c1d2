//! gamelink
//!
//! A broker that links chat-platform users to their game-platform
//! accounts. A user claims an account, receives a one-time code,
//! proves control by entering the code in-game, and an in-game oracle
//! reports the confirmation back; only then is the link written.

pub mod code;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod resolver;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use coordinator::VerificationCoordinator;
pub use error::LinkError;
pub use resolver::{AccountResolver, ResolveError, RobloxResolver};
pub use state::{AppState, IntakeState};
pub use store::{
    InMemoryLinkStore, InMemoryVerificationStore, LinkStore, SqliteStore, VerificationStore,
};
