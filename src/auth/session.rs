use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{AuthError, IdentityClaims, IdentityProvider};

struct Session {
    claims: IdentityClaims,
    expires_at: DateTime<Utc>,
}

/// Mints and verifies opaque session tokens.
///
/// Sessions are process-local; restarting the daemon signs everyone out.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionManager {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, ttl_hours: i64) -> Self {
        Self {
            provider,
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Session lifetime in whole seconds, for the cookie `Max-Age`.
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Verify a credential with the identity provider and mint a session.
    pub async fn sign_in(&self, credential: &str) -> Result<(String, IdentityClaims), AuthError> {
        let claims = self.provider.verify_credential(credential).await?;
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            token.clone(),
            Session {
                claims: claims.clone(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        debug!(uid = %claims.uid, "Session created");
        Ok((token, claims))
    }

    /// Look up a session token, dropping it if expired.
    pub async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.claims.clone()),
            Some(_) => {
                sessions.remove(token);
                Err(AuthError::InvalidSession)
            }
            None => Err(AuthError::InvalidSession),
        }
    }

    /// Forget a session token. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            debug!("Session revoked");
        }
    }
}
