//! Session persistence and wiring of the shared session holder.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::sync::Arc;

use bedwatch_core::auth::{
    AuthError, AuthResult, AuthSession, MemorySessionStore, SessionPersistence, SupabaseAuthClient,
};
use bedwatch_core::config::BackendConfig;
use bedwatch_core::records::{HospitalClient, HospitalService};
use bedwatch_core::session::SessionHolder;

use crate::secret_store::{self, SECRET_SUPABASE_SESSION};

/// Where the session survives restarts.
#[derive(Debug, Clone)]
pub enum SessionStore {
    /// Platform keystore.
    Secure,
    /// Lost on restart; used when the keystore is unavailable.
    Memory(MemorySessionStore),
}

impl SessionStore {
    pub fn detect() -> Self {
        if secret_store::is_available() {
            Self::Secure
        } else {
            tracing::warn!("Secure storage unavailable, session will not persist");
            Self::Memory(MemorySessionStore::default())
        }
    }
}

impl SessionPersistence for SessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        match self {
            Self::Secure => match secret_store::read_secret(SECRET_SUPABASE_SESSION) {
                Ok(Some(value)) => Ok(Some(serde_json::from_str(&value)?)),
                Ok(None) => Ok(None),
                Err(error) => Err(AuthError::SecureStorage(error.to_string())),
            },
            Self::Memory(store) => store.load_session(),
        }
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        match self {
            Self::Secure => {
                let serialized = serde_json::to_string(session)?;
                secret_store::write_secret(SECRET_SUPABASE_SESSION, &serialized)
                    .map_err(|error| AuthError::SecureStorage(error.to_string()))
            }
            Self::Memory(store) => store.save_session(session),
        }
    }

    fn clear_session(&self) -> AuthResult<()> {
        match self {
            Self::Secure => secret_store::delete_secret(SECRET_SUPABASE_SESSION)
                .map_err(|error| AuthError::SecureStorage(error.to_string())),
            Self::Memory(store) => store.clear_session(),
        }
    }
}

/// Everything the screens need to talk to the backend.
#[derive(Clone)]
pub struct Backend {
    pub session: Arc<SessionHolder<SessionStore>>,
    pub hospitals: HospitalService,
}

impl Backend {
    /// `Ok(None)` when the build carries no backend configuration.
    pub fn connect(
        config: &BackendConfig,
        store: SessionStore,
    ) -> bedwatch_core::Result<Option<Self>> {
        let Some(endpoint) = config.endpoint()? else {
            return Ok(None);
        };

        let auth = SupabaseAuthClient::from_endpoint(&endpoint, store)?;
        let records = HospitalClient::from_endpoint(&endpoint)?;
        Ok(Some(Self {
            session: SessionHolder::new(auth),
            hospitals: HospitalService::new(records),
        }))
    }
}

// Props comparison: two handles are the same backend when they share a holder.
impl PartialEq for Backend {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }
}

#[cfg(test)]
mod tests {
    use bedwatch_core::auth::AuthUser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn session() -> AuthSession {
        AuthSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: 4_102_444_800,
            user: AuthUser {
                id: "admin-1".to_string(),
                email: Some("a@b.com".to_string()),
            },
        }
    }

    #[test]
    fn secure_store_roundtrip() {
        let store = SessionStore::Secure;
        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);

        store.save_session(&session()).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session()));

        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);
    }

    #[test]
    fn host_builds_detect_secure_store() {
        assert!(matches!(SessionStore::detect(), SessionStore::Secure));
    }

    #[test]
    fn connect_without_config_returns_none() {
        let backend = Backend::connect(&BackendConfig::default(), SessionStore::detect()).unwrap();
        assert!(backend.is_none());
    }

    #[test]
    fn connect_rejects_half_config() {
        let config = BackendConfig {
            supabase_url: Some("https://demo.supabase.co".to_string()),
            supabase_anon_key: None,
        };
        let error = Backend::connect(&config, SessionStore::detect()).err().unwrap();
        assert!(matches!(error, bedwatch_core::Error::Config(_)));
    }
}
