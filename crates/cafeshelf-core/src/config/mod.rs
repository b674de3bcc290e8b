//! Backend configuration for client apps.
//!
//! The database URL and auth API key come from the environment; the auth
//! endpoints can be overridden for emulators. R2 blob storage reads its
//! own variables (see `storage::R2Config`).

use std::env;

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const ENV_DATABASE_URL: &str = "CAFESHELF_DATABASE_URL";
const ENV_AUTH_API_KEY: &str = "CAFESHELF_AUTH_API_KEY";
const ENV_AUTH_ENDPOINT: &str = "CAFESHELF_AUTH_ENDPOINT";
const ENV_TOKEN_ENDPOINT: &str = "CAFESHELF_TOKEN_ENDPOINT";

/// Backend endpoints and public keys the client needs to bootstrap.
///
/// These are safe-to-ship public values; secret credentials never live
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Realtime database base URL.
    pub database_url: String,
    /// Public API key for the auth capability.
    pub auth_api_key: String,
    /// Optional identity endpoint override (emulator/testing).
    pub auth_endpoint: Option<String>,
    /// Optional token-refresh endpoint override (emulator/testing).
    pub token_endpoint: Option<String>,
}

impl BackendConfig {
    /// Load backend configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no backend variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<BackendConfig>> {
    let database_url = normalize_text_option(lookup(ENV_DATABASE_URL));
    let auth_api_key = normalize_text_option(lookup(ENV_AUTH_API_KEY));
    let auth_endpoint = normalize_text_option(lookup(ENV_AUTH_ENDPOINT));
    let token_endpoint = normalize_text_option(lookup(ENV_TOKEN_ENDPOINT));

    if database_url.is_none()
        && auth_api_key.is_none()
        && auth_endpoint.is_none()
        && token_endpoint.is_none()
    {
        return Ok(None);
    }

    let mut missing = Vec::new();
    if database_url.is_none() {
        missing.push(ENV_DATABASE_URL);
    }
    if auth_api_key.is_none() {
        missing.push(ENV_AUTH_API_KEY);
    }
    if !missing.is_empty() {
        return Err(Error::InvalidInput(format!(
            "Backend configuration is incomplete. Missing: {}",
            missing.join(", ")
        )));
    }

    let database_url = database_url.expect("validated above");
    if !is_http_url(&database_url) {
        return Err(Error::InvalidInput(format!(
            "{ENV_DATABASE_URL} must include http:// or https://"
        )));
    }

    Ok(Some(BackendConfig {
        database_url: database_url.trim_end_matches('/').to_string(),
        auth_api_key: auth_api_key.expect("validated above"),
        auth_endpoint,
        token_endpoint,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_from_map(map: &HashMap<&str, &str>) -> Result<Option<BackendConfig>> {
        parse_config(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn parse_config_none_returns_none() {
        let map = HashMap::new();
        assert!(parse_from_map(&map).unwrap().is_none());
    }

    #[test]
    fn parse_config_requires_url_and_key() {
        let mut map = HashMap::new();
        map.insert(ENV_AUTH_API_KEY, "public-key");

        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => assert!(message.contains(ENV_DATABASE_URL)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_config_rejects_non_http_database_url() {
        let mut map = HashMap::new();
        map.insert(ENV_DATABASE_URL, "db.example.com");
        map.insert(ENV_AUTH_API_KEY, "public-key");

        assert!(parse_from_map(&map).is_err());
    }

    #[test]
    fn parse_config_trims_trailing_slash() {
        let mut map = HashMap::new();
        map.insert(ENV_DATABASE_URL, "https://db.example.com/");
        map.insert(ENV_AUTH_API_KEY, "public-key");

        let config = parse_from_map(&map).unwrap().unwrap();
        assert_eq!(config.database_url, "https://db.example.com");
        assert_eq!(config.auth_api_key, "public-key");
        assert_eq!(config.auth_endpoint, None);
    }

    #[test]
    fn parse_config_keeps_endpoint_overrides() {
        let mut map = HashMap::new();
        map.insert(ENV_DATABASE_URL, "https://db.example.com");
        map.insert(ENV_AUTH_API_KEY, "public-key");
        map.insert(ENV_AUTH_ENDPOINT, "http://localhost:9099/v1");
        map.insert(ENV_TOKEN_ENDPOINT, "http://localhost:9099/token/v1");

        let config = parse_from_map(&map).unwrap().unwrap();
        assert_eq!(
            config.auth_endpoint.as_deref(),
            Some("http://localhost:9099/v1")
        );
        assert_eq!(
            config.token_endpoint.as_deref(),
            Some("http://localhost:9099/token/v1")
        );
    }
}
