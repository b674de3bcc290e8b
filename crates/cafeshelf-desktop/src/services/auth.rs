//! Authentication service for the desktop app.
//!
//! Sessions live in memory only; closing the app signs the user out.

use cafeshelf_core::auth::{AuthClient, AuthResult, AuthSession, MemorySessionStore};
use cafeshelf_core::config::BackendConfig;

#[derive(Clone)]
pub struct AuthService {
    inner: AuthClient<MemorySessionStore>,
}

impl AuthService {
    pub fn new(config: &BackendConfig) -> AuthResult<Self> {
        let mut client = AuthClient::new(&config.auth_api_key, MemorySessionStore::new())?;
        if let Some(endpoint) = &config.auth_endpoint {
            client = client.with_identity_endpoint(endpoint)?;
        }
        if let Some(endpoint) = &config.token_endpoint {
            client = client.with_token_endpoint(endpoint)?;
        }
        Ok(Self { inner: client })
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        self.inner.restore_session().await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        self.inner.sign_in(email, password).await
    }

    pub fn sign_out(&self) -> AuthResult<()> {
        self.inner.sign_out()
    }
}
