use async_trait::async_trait;

use crate::utils::compute_hash;

use super::AuthError;

/// Identity facts returned by the provider on a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub uid: String,
    pub email: Option<String>,
}

/// Hosted-identity collaborator: verify a credential, yield claims.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_credential(&self, credential: &str) -> Result<IdentityClaims, AuthError>;
}

/// Provider that accepts the single admin credential from configuration.
///
/// Only the SHA-256 digest of the configured credential is kept; with no
/// credential configured every sign-in is rejected.
pub struct StaticTokenProvider {
    digest: Option<String>,
    uid: String,
    email: Option<String>,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(admin_token: Option<&str>, uid: &str, email: Option<&str>) -> Self {
        Self {
            digest: admin_token.map(|token| compute_hash(token.as_bytes())),
            uid: uid.to_string(),
            email: email.map(ToString::to_string),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn verify_credential(&self, credential: &str) -> Result<IdentityClaims, AuthError> {
        let expected = self.digest.as_ref().ok_or(AuthError::InvalidCredential)?;
        if &compute_hash(credential.as_bytes()) == expected {
            Ok(IdentityClaims {
                uid: self.uid.clone(),
                email: self.email.clone(),
            })
        } else {
            Err(AuthError::InvalidCredential)
        }
    }
}
