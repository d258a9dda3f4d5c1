//! Session-gated screen selection.

use crate::auth::AuthSession;

/// The two mutually exclusive screen trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login screen.
    Auth,
    /// Home screen with the availability form.
    Protected,
}

/// Pick the screen tree for the current session.
pub fn route_for(session: Option<&AuthSession>) -> Route {
    match session {
        Some(session) if session.has_user() => Route::Protected,
        _ => Route::Auth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    fn session_for(user_id: &str) -> AuthSession {
        AuthSession {
            access_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: 0,
            user: AuthUser {
                id: user_id.to_string(),
                email: None,
            },
        }
    }

    #[test]
    fn no_session_routes_to_auth() {
        assert_eq!(route_for(None), Route::Auth);
    }

    #[test]
    fn session_with_user_routes_to_protected() {
        assert_eq!(route_for(Some(&session_for("admin-1"))), Route::Protected);
    }

    #[test]
    fn session_without_user_routes_to_auth() {
        assert_eq!(route_for(Some(&session_for(""))), Route::Auth);
        assert_eq!(route_for(Some(&session_for("   "))), Route::Auth);
    }
}
