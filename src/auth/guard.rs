use async_trait::async_trait;

use super::{AuthError, IdentityClaims, SessionManager};

/// Authenticated-or-not check consumed by the services.
///
/// Services call this before any store access on a mutating operation.
#[async_trait]
pub trait SessionGuard: Send + Sync {
    async fn authenticate(&self, token: Option<&str>) -> Result<IdentityClaims, AuthError>;
}

#[async_trait]
impl SessionGuard for SessionManager {
    async fn authenticate(&self, token: Option<&str>) -> Result<IdentityClaims, AuthError> {
        let token = token.ok_or(AuthError::MissingSession)?;
        self.verify(token).await
    }
}
