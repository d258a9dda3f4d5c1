//! Process-wide auth session state.
//!
//! [`SessionHolder`] owns the current [`AuthSession`] and is the only place it
//! changes. Auth operations (sign-in, sign-out, refresh, restore) and the app
//! foreground/background signal both end up in a single `apply` step, which
//! updates a `watch` channel for session observers and a `broadcast` channel
//! for auth-change listeners.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::auth::{AuthResult, AuthSession, SessionPersistence, SupabaseAuthClient};

/// How often the background task checks the session while the app is active.
pub const AUTO_REFRESH_TICK: Duration = Duration::from_secs(30);

/// Refresh once the token expires within this many ticks.
const AUTO_REFRESH_TICK_THRESHOLD: u32 = 3;

const AUTH_EVENT_CAPACITY: usize = 16;

/// A change to the current session, as seen by listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChange {
    InitialSession(Option<AuthSession>),
    SignedIn(AuthSession),
    TokenRefreshed(AuthSession),
    SignedOut,
}

impl AuthChange {
    pub const fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::InitialSession(session) => session.as_ref(),
            Self::SignedIn(session) | Self::TokenRefreshed(session) => Some(session),
            Self::SignedOut => None,
        }
    }
}

/// Foreground/background state reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    Active,
    Inactive,
}

/// Observer handle for the current session. Dropping it unsubscribes.
#[derive(Debug, Clone)]
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<AuthSession>>,
}

impl SessionSubscription {
    pub fn current(&self) -> Option<AuthSession> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the holder is gone.
    pub async fn changed(&mut self) -> Option<Option<AuthSession>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

pub struct SessionHolder<S: SessionPersistence> {
    auth: SupabaseAuthClient<S>,
    state: watch::Sender<Option<AuthSession>>,
    events: broadcast::Sender<AuthChange>,
    // Serializes every operation that talks to the auth backend.
    auth_lock: tokio::sync::Mutex<()>,
    app_state: Mutex<AppLifecycle>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SessionPersistence> SessionHolder<S> {
    pub fn new(auth: SupabaseAuthClient<S>) -> Arc<Self> {
        let (state, _) = watch::channel(None);
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Arc::new(Self {
            auth,
            state,
            events,
            auth_lock: tokio::sync::Mutex::new(()),
            app_state: Mutex::new(AppLifecycle::Active),
            refresh_task: Mutex::new(None),
        })
    }

    pub fn current(&self) -> Option<AuthSession> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.state.subscribe(),
        }
    }

    pub fn auth_events(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }

    /// Restore the persisted session at startup.
    ///
    /// Runs under the auth lock, so a sign-in that wins the race has already
    /// written the store and the restored value is that newer session.
    pub async fn initialize(&self) -> AuthResult<Option<AuthSession>> {
        let _guard = self.auth_lock.lock().await;
        let restored = self.auth.restore_session().await?;
        tracing::info!(restored = restored.is_some(), "Auth session initialized");
        self.apply(AuthChange::InitialSession(restored.clone()));
        Ok(restored)
    }

    /// Sign in; the session only changes when the backend accepts.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let _guard = self.auth_lock.lock().await;
        match self.auth.sign_in(email, password).await {
            Ok(session) => {
                tracing::info!(user = %session.user.id, "Signed in");
                self.apply(AuthChange::SignedIn(session.clone()));
                Ok(session)
            }
            Err(error) => {
                tracing::warn!("Sign-in failed: {}", error);
                Err(error)
            }
        }
    }

    /// Sign out. The local session is dropped even when the backend call fails.
    pub async fn sign_out(&self) -> AuthResult<()> {
        let _guard = self.auth_lock.lock().await;
        let Some(session) = self.current() else {
            return Ok(());
        };

        let result = match self.auth.sign_out(&session.access_token).await {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!("Remote sign-out failed, clearing local session: {}", error);
                if let Err(clear_error) = self.auth.forget_session() {
                    tracing::warn!("Failed to clear persisted session: {}", clear_error);
                }
                Err(error)
            }
        };
        self.apply(AuthChange::SignedOut);
        result
    }

    /// Exchange the refresh token for a new session now.
    ///
    /// A backend rejection means the session is no longer valid and signs the
    /// user out locally; transport errors leave the session in place.
    pub async fn refresh_now(&self) -> AuthResult<Option<AuthSession>> {
        let _guard = self.auth_lock.lock().await;
        let Some(session) = self.current() else {
            return Ok(None);
        };

        match self.auth.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => {
                tracing::debug!(expires_at = refreshed.expires_at, "Session refreshed");
                self.apply(AuthChange::TokenRefreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            Err(error) if error.is_rejection() => {
                tracing::warn!("Session refresh rejected, signing out: {}", error);
                if let Err(clear_error) = self.auth.forget_session() {
                    tracing::warn!("Failed to clear persisted session: {}", clear_error);
                }
                self.apply(AuthChange::SignedOut);
                Err(error)
            }
            Err(error) => {
                tracing::warn!("Session refresh failed, will retry: {}", error);
                Err(error)
            }
        }
    }

    /// Start or stop background token refresh. Must be called inside a
    /// Tokio runtime; repeated calls with the same state are no-ops.
    pub fn set_app_state(self: &Arc<Self>, state: AppLifecycle) {
        *self
            .app_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = state;
        let mut task = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match state {
            AppLifecycle::Active => {
                if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
                    return;
                }
                tracing::debug!("Starting session auto-refresh");
                *task = Some(spawn_auto_refresh(Arc::downgrade(self)));
            }
            AppLifecycle::Inactive => {
                if let Some(handle) = task.take() {
                    tracing::debug!("Stopping session auto-refresh");
                    handle.abort();
                }
            }
        }
    }

    /// Last state reported through [`Self::set_app_state`]; a new holder
    /// assumes the app is in the foreground.
    pub fn app_state(&self) -> AppLifecycle {
        *self
            .app_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply the last reported app state again. Called once startup restore
    /// is done so a background transition during restore is respected.
    pub fn resume_app_state(self: &Arc<Self>) {
        self.set_app_state(self.app_state());
    }

    #[cfg(test)]
    fn is_auto_refreshing(&self) -> bool {
        self.refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn refresh_if_expiring(&self) {
        let Some(session) = self.current() else {
            return;
        };
        let threshold = AUTO_REFRESH_TICK.as_secs() * u64::from(AUTO_REFRESH_TICK_THRESHOLD);
        if !session.expires_within(i64::try_from(threshold).unwrap_or(i64::MAX)) {
            return;
        }
        // Failures are already logged and handled by refresh_now.
        let _ = self.refresh_now().await;
    }

    fn apply(&self, change: AuthChange) {
        let next = change.session().cloned();
        self.state.send_modify(|current| *current = next);
        // No listeners is fine.
        let _ = self.events.send(change);
    }
}

impl<S: SessionPersistence> Drop for SessionHolder<S> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .refresh_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

fn spawn_auto_refresh<S: SessionPersistence>(holder: Weak<SessionHolder<S>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(AUTO_REFRESH_TICK);
        loop {
            ticker.tick().await;
            let Some(holder) = holder.upgrade() else {
                break;
            };
            holder.refresh_if_expiring().await;
        }
    })
}
