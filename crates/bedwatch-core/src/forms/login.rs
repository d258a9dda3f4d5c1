//! Login screen state.

use crate::auth::{AuthError, AuthSession};

use super::Alert;

const MISSING_CREDENTIALS: &str = "Please enter both email and password";
const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// What the screen should do when the user presses "Sign In".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginSubmit {
    /// Call sign-in with these credentials; the form is now loading.
    Ready(Credentials),
    /// A sign-in is already in flight.
    Busy,
    /// Show the alert and do not call the backend.
    Rejected(Alert),
}

impl LoginForm {
    /// Presence check only; the backend decides whether the email is valid.
    pub fn begin_submit(&mut self) -> LoginSubmit {
        if self.loading {
            return LoginSubmit::Busy;
        }
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return LoginSubmit::Rejected(Alert::info(MISSING_CREDENTIALS));
        }

        self.loading = true;
        LoginSubmit::Ready(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }

    /// Clear the loading flag and turn a failure into an alert carrying the
    /// backend's message.
    pub fn finish(&mut self, result: &Result<AuthSession, AuthError>) -> Option<Alert> {
        self.loading = false;
        match result {
            Ok(_) => {
                self.password.clear();
                None
            }
            Err(error) => Some(Alert::error(LOGIN_FAILED, error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::AuthUser;
    use crate::forms::AlertKind;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            loading: false,
        }
    }

    #[test]
    fn empty_fields_are_rejected_without_loading() {
        for mut form in [form("", "x"), form("a@b.com", ""), form("   ", "x")] {
            assert_eq!(
                form.begin_submit(),
                LoginSubmit::Rejected(Alert::info("Please enter both email and password"))
            );
            assert!(!form.loading);
        }
    }

    #[test]
    fn submit_trims_email_and_sets_loading() {
        let mut form = form(" a@b.com ", "x");
        assert_eq!(
            form.begin_submit(),
            LoginSubmit::Ready(Credentials {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
        );
        assert!(form.loading);
        assert_eq!(form.begin_submit(), LoginSubmit::Busy);
    }

    #[test]
    fn failure_surfaces_backend_message_verbatim() {
        let mut form = form("a@b.com", "wrong");
        form.begin_submit();
        let alert = form
            .finish(&Err(AuthError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }))
            .unwrap();

        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.title, "Login failed");
        assert_eq!(alert.message.as_deref(), Some("Invalid login credentials"));
        assert!(!form.loading);
        assert_eq!(form.password, "wrong");
    }

    #[test]
    fn success_clears_password_and_loading() {
        let mut form = form("a@b.com", "x");
        form.begin_submit();
        let session = AuthSession {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: 0,
            user: AuthUser {
                id: "u".to_string(),
                email: None,
            },
        };
        assert_eq!(form.finish(&Ok(session)), None);
        assert!(!form.loading);
        assert!(form.password.is_empty());
    }
}
