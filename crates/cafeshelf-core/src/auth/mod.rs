//! Auth capability client.
//!
//! Talks to an Identity-Toolkit-compatible REST API: password sign-in and
//! token refresh. Sign-out in this dialect is client-side only, so it just
//! clears the persisted session.

use std::fmt;
use std::sync::{Arc, Mutex};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::compact_text;

const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com/v1";
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= crate::util::unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Auth is not configured for this build.")]
    NotConfigured,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Session store error: {0}")]
    SessionStore(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Seam for session storage. The desktop app keeps sessions in memory
/// only; the backend owns the durable session state.
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// In-memory session store. Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let guard = self
            .session
            .lock()
            .map_err(|_| AuthError::SessionStore("session store poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| AuthError::SessionStore("session store poisoned".to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| AuthError::SessionStore("session store poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AuthClient<S: SessionPersistence> {
    identity_endpoint: String,
    token_endpoint: String,
    api_key: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> AuthClient<S> {
    pub fn new(api_key: impl Into<String>, store: S) -> AuthResult<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Auth API key must not be empty",
            ));
        }

        Ok(Self {
            identity_endpoint: DEFAULT_IDENTITY_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            api_key,
            client: Client::builder().build()?,
            store,
        })
    }

    /// Override the identity endpoint (emulator or tests). The token
    /// endpoint keeps its current value.
    pub fn with_identity_endpoint(mut self, endpoint: &str) -> AuthResult<Self> {
        self.identity_endpoint = normalize_endpoint(endpoint)?;
        Ok(self)
    }

    /// Override the token-refresh endpoint (emulator or tests). The
    /// identity endpoint keeps its current value.
    pub fn with_token_endpoint(mut self, endpoint: &str) -> AuthResult<Self> {
        self.token_endpoint = normalize_endpoint(endpoint)?;
        Ok(self)
    }

    /// Load the stored session, refreshing it through the token endpoint
    /// when it is expired. A failed refresh clears the stored session.
    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        match self.refresh_session(&stored_session.refresh_token).await {
            Ok(refreshed) => {
                self.store.save_session(&refreshed)?;
                Ok(Some(refreshed))
            }
            Err(error) => {
                tracing::warn!("Failed to refresh stored session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response = self
            .client
            .post(format!(
                "{}/accounts:signInWithPassword",
                self.identity_endpoint
            ))
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }

        let payload = response.json::<SignInResponse>().await?;
        let session = payload.into_session()?;
        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }

        let response = self
            .client
            .post(format!("{}/token", self.token_endpoint))
            .query(&[("key", &self.api_key)])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }

        let payload = response.json::<RefreshResponse>().await?;
        let session = payload.into_session()?;
        self.store.save_session(&session)?;
        Ok(session)
    }

    /// Drop the local session. The vendor keeps no server-side session
    /// for this credential flow, so there is nothing remote to revoke.
    pub fn sign_out(&self) -> AuthResult<()> {
        self.store.clear_session()
    }
}

fn normalize_endpoint(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Auth endpoint must not be empty",
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AuthError::InvalidConfiguration(
            "Auth endpoint must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_credentials(email: &str, password: &str) -> AuthResult<()> {
    if email.trim().is_empty() {
        return Err(AuthError::Api("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(AuthError::Api("Password is required".to_string()));
    }
    Ok(())
}

fn expires_at_from(expires_in: &str) -> AuthResult<i64> {
    let seconds: i64 = expires_in
        .trim()
        .parse()
        .map_err(|_| AuthError::Api("Auth response had a non-numeric expiry".to_string()))?;
    Ok(crate::util::unix_timestamp_now().saturating_add(seconds))
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(rename = "idToken")]
    id_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(rename = "expiresIn")]
    expires_in: Option<String>,
    #[serde(rename = "localId")]
    local_id: Option<String>,
    email: Option<String>,
}

impl SignInResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        match (self.id_token, self.refresh_token, self.expires_in, self.local_id) {
            (Some(id_token), Some(refresh_token), Some(expires_in), Some(local_id)) => {
                Ok(AuthSession {
                    id_token,
                    refresh_token,
                    expires_at: expires_at_from(&expires_in)?,
                    user: AuthUser {
                        id: local_id,
                        email: self.email,
                    },
                })
            }
            _ => Err(AuthError::Api(
                "Sign-in response did not include enough session fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    user_id: Option<String>,
}

impl RefreshResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        match (self.id_token, self.refresh_token, self.expires_in, self.user_id) {
            (Some(id_token), Some(refresh_token), Some(expires_in), Some(user_id)) => {
                Ok(AuthSession {
                    id_token,
                    refresh_token,
                    expires_at: expires_at_from(&expires_in)?,
                    user: AuthUser {
                        id: user_id,
                        email: None,
                    },
                })
            }
            _ => Err(AuthError::Api(
                "Refresh response did not include enough session fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = payload.error.and_then(|error| error.message) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(expires_at: i64) -> AuthSession {
        AuthSession {
            id_token: "secret-id-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at,
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("user@example.com".to_string()),
            },
        }
    }

    #[test]
    fn normalize_endpoint_strips_trailing_slash() {
        let normalized = normalize_endpoint("https://auth.example.com/v1/").unwrap();
        assert_eq!(normalized, "https://auth.example.com/v1");
    }

    #[test]
    fn normalize_endpoint_rejects_missing_scheme() {
        assert!(normalize_endpoint("auth.example.com").is_err());
    }

    #[test]
    fn new_rejects_empty_api_key() {
        assert!(AuthClient::new("   ", MemorySessionStore::new()).is_err());
    }

    #[test]
    fn endpoint_overrides_apply_independently() {
        let client = AuthClient::new("api-key", MemorySessionStore::new())
            .unwrap()
            .with_identity_endpoint("http://localhost:9099/v1")
            .unwrap();
        assert_eq!(client.identity_endpoint, "http://localhost:9099/v1");
        assert_eq!(client.token_endpoint, DEFAULT_TOKEN_ENDPOINT);

        let client = AuthClient::new("api-key", MemorySessionStore::new())
            .unwrap()
            .with_token_endpoint("http://localhost:9099/token/v1")
            .unwrap();
        assert_eq!(client.identity_endpoint, DEFAULT_IDENTITY_ENDPOINT);
        assert_eq!(client.token_endpoint, "http://localhost:9099/token/v1");
    }

    #[test]
    fn validate_credentials_requires_both_fields() {
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("user@example.com", " ").is_err());
        assert!(validate_credentials("user@example.com", "secret").is_ok());
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let rendered = format!("{:?}", sample_session(1_700_000_000));
        assert!(!rendered.contains("secret-id-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn session_expiry_applies_skew() {
        let expired = sample_session(crate::util::unix_timestamp_now() + 30);
        assert!(expired.is_expired());

        let live = sample_session(crate::util::unix_timestamp_now() + 3600);
        assert!(!live.is_expired());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.load_session().unwrap().is_none());

        let session = sample_session(1_700_000_000);
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn sign_out_clears_stored_session() {
        let store = MemorySessionStore::new();
        store.save_session(&sample_session(1_700_000_000)).unwrap();

        let client = AuthClient::new("api-key", store.clone()).unwrap();
        client.sign_out().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn parse_api_error_prefers_vendor_message() {
        let body = r#"{"error":{"code":400,"message":"INVALID_PASSWORD"}}"#;
        let message = parse_api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(message, "INVALID_PASSWORD (400)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body() {
        let message = parse_api_error(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(message, "upstream unavailable (502)");
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }

    #[test]
    fn sign_in_response_requires_all_fields() {
        let incomplete = SignInResponse {
            id_token: Some("token".to_string()),
            refresh_token: None,
            expires_in: Some("3600".to_string()),
            local_id: Some("user".to_string()),
            email: None,
        };
        assert!(incomplete.into_session().is_err());
    }

    #[test]
    fn sign_in_response_parses_expiry_seconds() {
        let response = SignInResponse {
            id_token: Some("token".to_string()),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some("3600".to_string()),
            local_id: Some("user".to_string()),
            email: Some("user@example.com".to_string()),
        };
        let session = response.into_session().unwrap();
        assert!(session.expires_at > crate::util::unix_timestamp_now());
        assert_eq!(session.user.email.as_deref(), Some("user@example.com"));
    }
}
