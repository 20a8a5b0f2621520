//! Session gating for mutating operations.
//!
//! Identity verification is delegated to a provider behind
//! [`IdentityProvider`]; the rest of the crate only ever consumes the
//! authenticated-or-not fact through [`SessionGuard`].

mod guard;
mod provider;
mod session;

pub use guard::SessionGuard;
pub use provider::{IdentityClaims, IdentityProvider, StaticTokenProvider};
pub use session::SessionManager;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Missing session token")]
    MissingSession,

    #[error("Session expired or unknown")]
    InvalidSession,
}
