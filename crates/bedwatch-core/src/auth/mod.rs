//! Supabase auth client for email/password sessions.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{normalize_base_url, BackendEndpoint, ConfigError};
use crate::util::unix_timestamp_now;

const AUTH_PATH: &str = "/auth/v1";
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_within(EXPIRY_SKEW_SECONDS)
    }

    /// Whether the access token expires within `seconds` from now.
    #[must_use]
    pub fn expires_within(&self, seconds: i64) -> bool {
        self.expires_at <= unix_timestamp_now().saturating_add(seconds)
    }

    /// Whether the session identifies a user the app can act for.
    #[must_use]
    pub fn has_user(&self) -> bool {
        !self.user.id.trim().is_empty()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Supabase auth is not configured for this build.")]
    NotConfigured,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("{0}")]
    MissingCredentials(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The backend answered with an error status; `message` is its own text.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

impl AuthError {
    /// True when the backend refused the request, as opposed to a transport
    /// or local failure.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if *status >= 400 && *status < 500)
    }
}

impl From<ConfigError> for AuthError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Incomplete => Self::NotConfigured,
            ConfigError::InvalidUrl => {
                Self::InvalidConfiguration("Supabase URL must include http:// or https://")
            }
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Where the current session survives between app launches.
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Transient session storage for platforms without a secure store.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<AuthSession>>>,
}

impl MemorySessionStore {
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SupabaseAuthClient<S: SessionPersistence> {
    auth_url: String,
    anon_key: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> SupabaseAuthClient<S> {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>, store: S) -> AuthResult<Self> {
        let auth_url = normalize_auth_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self {
            auth_url,
            anon_key,
            client: Client::builder().build()?,
            store,
        })
    }

    pub fn from_endpoint(endpoint: &BackendEndpoint, store: S) -> AuthResult<Self> {
        Self::new(&endpoint.base_url, endpoint.anon_key.clone(), store)
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        // Only a backend rejection invalidates the stored session. Transport
        // and server errors keep it so a later refresh can still succeed.
        match self.refresh_session(&stored_session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) if error.is_rejection() => {
                tracing::warn!("Persisted session was rejected, clearing it: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session, keeping it: {}", error);
                Ok(Some(stored_session))
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "password")])
                .json(&payload),
        );

        let response = self.send_auth_request(request).await?;
        let session = response.into_session()?.ok_or_else(|| {
            AuthError::Api("Sign-in response did not include an active session".to_string())
        })?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }

        let payload = serde_json::json!({
            "refresh_token": refresh_token,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "refresh_token")])
                .json(&payload),
        );
        let response = self.send_auth_request(request).await?;
        let session = response.into_session()?.ok_or_else(|| {
            AuthError::Api("Refresh response did not include an active session".to_string())
        })?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token);

        let response = request.send().await?;
        if !(response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED) {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(status, &body));
        }

        self.store.clear_session()?;
        Ok(())
    }

    /// Drop the persisted session without contacting the backend.
    pub fn forget_session(&self) -> AuthResult<()> {
        self.store.clear_session()
    }

    fn public_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn send_auth_request(&self, request: RequestBuilder) -> AuthResult<SupabaseAuthResponse> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(status, &body));
        }
        Ok(response.json::<SupabaseAuthResponse>().await?)
    }
}

pub fn normalize_auth_url(url: &str) -> AuthResult<String> {
    if url.trim().is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    Ok(format!("{}{AUTH_PATH}", normalize_base_url(url)?))
}

fn validate_credentials(email: &str, password: &str) -> AuthResult<()> {
    if email.trim().is_empty() {
        return Err(AuthError::MissingCredentials("Email is required"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingCredentials("Password is required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SupabaseAuthResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<SupabaseUser>,
    session: Option<SupabaseAuthResponseSession>,
}

impl SupabaseAuthResponse {
    fn into_session(self) -> AuthResult<Option<AuthSession>> {
        let nested_session = self.session;
        let access_token = self.access_token.or_else(|| {
            nested_session
                .as_ref()
                .and_then(|session| session.access_token.clone())
        });
        let refresh_token = self.refresh_token.or_else(|| {
            nested_session
                .as_ref()
                .and_then(|session| session.refresh_token.clone())
        });
        let expires_at = self
            .expires_at
            .or_else(|| {
                nested_session
                    .as_ref()
                    .and_then(|session| session.expires_at)
            })
            .or_else(|| {
                self.expires_in
                    .or_else(|| {
                        nested_session
                            .as_ref()
                            .and_then(|session| session.expires_in)
                    })
                    .map(|expires_in| unix_timestamp_now().saturating_add(expires_in))
            });
        let user = self
            .user
            .or_else(|| nested_session.and_then(|session| session.user))
            .map(Into::into);

        match (access_token, refresh_token, expires_at, user) {
            (Some(access_token), Some(refresh_token), Some(expires_at), Some(user)) => {
                Ok(Some(AuthSession {
                    access_token,
                    refresh_token,
                    expires_at,
                    user,
                }))
            }
            (None, None, None, Some(_)) => Ok(None),
            _ => Err(AuthError::Api(
                "Auth response did not include enough session fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseAuthResponseSession {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<SupabaseUser>,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
}

impl From<SupabaseUser> for AuthUser {
    fn from(value: SupabaseUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

fn rejected(status: StatusCode, body: &str) -> AuthError {
    AuthError::Rejected {
        status: status.as_u16(),
        message: parse_api_error(status, body),
    }
}

/// Extract the human-readable message from a GoTrue error body.
pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<SupabaseErrorResponse>(body) {
        if let Some(message) = payload
            .msg
            .or(payload.message)
            .or(payload.error_description)
            .or(payload.error)
        {
            return message.trim().to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        crate::util::compact_text(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn session_fixture(user_id: &str, expires_at: i64) -> AuthSession {
        AuthSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            user: AuthUser {
                id: user_id.to_string(),
                email: Some("a@b.com".to_string()),
            },
        }
    }

    fn token_body(access: &str, user_id: &str) -> serde_json::Value {
        serde_json::json!({
            "access_token": access,
            "refresh_token": format!("{access}-refresh"),
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": user_id, "email": "a@b.com" }
        })
    }

    #[test]
    fn normalize_auth_url_appends_auth_path() {
        let normalized = normalize_auth_url("https://demo.supabase.co").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn normalize_auth_url_keeps_existing_auth_path() {
        let normalized = normalize_auth_url("https://demo.supabase.co/auth/v1/").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn response_without_session_fields_is_not_a_session() {
        let response = SupabaseAuthResponse {
            access_token: None,
            refresh_token: None,
            expires_at: None,
            expires_in: None,
            user: Some(SupabaseUser {
                id: "user".to_string(),
                email: Some("user@example.com".to_string()),
            }),
            session: None,
        };
        assert!(response.into_session().unwrap().is_none());
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = AuthSession {
            access_token: "secret-access-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at: 1_700_000_000,
            user: AuthUser {
                id: "user".to_string(),
                email: None,
            },
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn parse_api_error_prefers_backend_message() {
        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_eq!(
            parse_api_error(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );
        let legacy = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            parse_api_error(StatusCode::BAD_REQUEST, legacy),
            "Invalid login credentials"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }

    #[test]
    fn rejection_is_only_client_errors() {
        assert!(rejected(StatusCode::BAD_REQUEST, "").is_rejection());
        assert!(!rejected(StatusCode::SERVICE_UNAVAILABLE, "").is_rejection());
        assert!(!AuthError::Api("x".to_string()).is_rejection());
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemorySessionStore::default();
        let other = store.clone();
        store.save_session(&session_fixture("u1", 1)).unwrap();
        assert_eq!(other.load_session().unwrap().unwrap().user.id, "u1");
        other.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_in_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon"))
            .and(body_json(serde_json::json!({"email": "a@b.com", "password": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok", "u1")))
            .mount(&server)
            .await;

        let store = MemorySessionStore::default();
        let client = SupabaseAuthClient::new(server.uri(), "anon", store.clone()).unwrap();
        let session = client.sign_in("a@b.com", "x").await.unwrap();

        assert_eq!(session.access_token, "tok");
        assert_eq!(session.user.id, "u1");
        assert!(!session.is_expired());
        assert_eq!(store.load_session().unwrap(), Some(session));
    }

    #[tokio::test]
    async fn sign_in_surfaces_backend_message_and_keeps_store_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let store = MemorySessionStore::default();
        let client = SupabaseAuthClient::new(server.uri(), "anon", store.clone()).unwrap();
        let error = client.sign_in("a@b.com", "wrong").await.unwrap_err();

        assert_eq!(error.to_string(), "Invalid login credentials");
        assert!(error.is_rejection());
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_refreshes_expired_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .and(body_json(serde_json::json!({"refresh_token": "refresh"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh", "u1")))
            .mount(&server)
            .await;

        let store = MemorySessionStore::with_session(session_fixture("u1", 0));
        let client = SupabaseAuthClient::new(server.uri(), "anon", store.clone()).unwrap();
        let restored = client.restore_session().await.unwrap().unwrap();

        assert_eq!(restored.access_token, "fresh");
        assert_eq!(store.load_session().unwrap().unwrap().access_token, "fresh");
    }

    #[tokio::test]
    async fn restore_clears_session_when_refresh_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "msg": "Invalid Refresh Token"
            })))
            .mount(&server)
            .await;

        let store = MemorySessionStore::with_session(session_fixture("u1", 0));
        let client = SupabaseAuthClient::new(server.uri(), "anon", store.clone()).unwrap();

        assert!(client.restore_session().await.unwrap().is_none());
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_keeps_session_when_backend_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let stored = session_fixture("u1", 0);
        let store = MemorySessionStore::with_session(stored.clone());
        let client = SupabaseAuthClient::new(server.uri(), "anon", store.clone()).unwrap();

        assert_eq!(client.restore_session().await.unwrap(), Some(stored.clone()));
        assert_eq!(store.load_session().unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn restore_keeps_session_when_backend_is_unreachable() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let stored = session_fixture("u1", 0);
        let store = MemorySessionStore::with_session(stored.clone());
        let client = SupabaseAuthClient::new(uri, "anon", store.clone()).unwrap();

        assert_eq!(client.restore_session().await.unwrap(), Some(stored.clone()));
        assert_eq!(store.load_session().unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn sign_out_treats_unauthorized_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer access"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = MemorySessionStore::with_session(session_fixture("u1", i64::MAX));
        let client = SupabaseAuthClient::new(server.uri(), "anon", store.clone()).unwrap();
        client.sign_out("access").await.unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn new_rejects_blank_anon_key() {
        let error = SupabaseAuthClient::new(
            "https://demo.supabase.co",
            "  ",
            MemorySessionStore::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(error, AuthError::InvalidConfiguration(_)));
    }
}
