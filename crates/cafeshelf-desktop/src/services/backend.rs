//! Backend service bundle.
//!
//! Built once at startup from the environment. The listing store is
//! constructed per use so it always carries the current session token.

use cafeshelf_core::config::BackendConfig;
use cafeshelf_core::storage::{R2Config, R2Storage};
use cafeshelf_core::store::RestListingStore;
use cafeshelf_core::Result;

use super::AuthService;

#[derive(Clone)]
pub struct BackendService {
    config: BackendConfig,
    auth: AuthService,
    blobs: Option<R2Storage>,
}

impl BackendService {
    /// Assemble the backend from environment variables.
    ///
    /// Returns `Ok(None)` when no backend is configured; the app then
    /// shows the login screen with a configuration hint.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(config) = BackendConfig::from_env()? else {
            return Ok(None);
        };
        let auth = AuthService::new(&config)?;
        let blobs = R2Config::from_env()?.map(R2Storage::new);
        if blobs.is_none() {
            tracing::warn!("Blob storage is not configured; covers will not load");
        }
        Ok(Some(Self {
            config,
            auth,
            blobs,
        }))
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// A listing store authenticated as the given session, or anonymous
    /// when no token is passed.
    pub fn store(&self, id_token: Option<&str>) -> Result<RestListingStore> {
        let store = RestListingStore::new(&self.config.database_url)?;
        Ok(match id_token {
            Some(token) => store.with_auth_token(token),
            None => store,
        })
    }

    #[must_use]
    pub const fn blobs(&self) -> Option<&R2Storage> {
        self.blobs.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_builds_from_configured_database_url() {
        let config = BackendConfig {
            database_url: "https://db.example.com".to_string(),
            auth_api_key: "public-key".to_string(),
            auth_endpoint: None,
            token_endpoint: None,
        };
        let backend = BackendService {
            auth: AuthService::new(&config).unwrap(),
            config,
            blobs: None,
        };

        assert!(backend.store(None).is_ok());
        assert!(backend.store(Some("token")).is_ok());
        assert!(backend.blobs().is_none());
    }
}
