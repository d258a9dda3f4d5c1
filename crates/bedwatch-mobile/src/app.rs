use bedwatch_core::router::{route_for, Route};
use bedwatch_core::AuthSession;
use dioxus::prelude::*;
use dioxus_primitives::toast::ToastProvider;

use crate::auth::{Backend, SessionStore};
use crate::bootstrap_config::load_backend_config;
use crate::lifecycle::use_app_lifecycle;
use crate::ui::{MOBILE_UI_STYLES, TOAST_STYLES};
use crate::views::{HomeScreen, LoginScreen};

#[component]
pub fn App() -> Element {
    rsx! {
        style {
            "{MOBILE_UI_STYLES}"
        }
        style {
            "{TOAST_STYLES}"
        }
        ToastProvider {
            AppShell {}
        }
    }
}

#[component]
fn AppShell() -> Element {
    let backend = use_hook(|| {
        Backend::connect(&load_backend_config(), SessionStore::detect())
            .map_err(|error| error.to_string())
    });

    match backend {
        Ok(Some(backend)) => rsx! {
            SessionGate { backend }
        },
        Ok(None) => rsx! {
            StartupMessage {
                title: "Backend not configured",
                detail: "Set SUPABASE_URL and SUPABASE_ANON_KEY before building the app.",
            }
        },
        Err(error) => rsx! {
            StartupMessage {
                title: "Backend configuration is invalid",
                detail: error,
            }
        },
    }
}

#[component]
fn SessionGate(backend: Backend) -> Element {
    let holder = backend.session.clone();
    use_context_provider(|| backend);
    let mut session = use_signal(|| None::<AuthSession>);
    let mut ready = use_signal(|| false);

    use_app_lifecycle(holder.clone());

    use_future(move || {
        let holder = holder.clone();
        async move {
            let mut subscription = holder.subscribe();
            if let Err(error) = holder.initialize().await {
                tracing::error!("Failed to restore auth session: {}", error);
            }
            session.set(subscription.current());
            ready.set(true);
            holder.resume_app_state();

            while let Some(next) = subscription.changed().await {
                session.set(next);
            }
        }
    });

    if !ready() {
        return rsx! {
            div {
                style: "
                    min-height: 100vh;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    color: #6b7280;
                    font-family: system-ui, sans-serif;
                ",
                "Loading..."
            }
        };
    }

    match route_for(session.read().as_ref()) {
        Route::Auth => rsx! {
            LoginScreen {}
        },
        Route::Protected => rsx! {
            HomeScreen {}
        },
    }
}

#[component]
fn StartupMessage(title: String, detail: String) -> Element {
    rsx! {
        div {
            style: "
                min-height: 100vh;
                display: flex;
                flex-direction: column;
                align-items: center;
                justify-content: center;
                gap: 8px;
                padding: 20px;
                font-family: system-ui, sans-serif;
            ",
            p {
                style: "margin: 0; font-size: 14px; font-weight: 600; color: #111827;",
                "{title}"
            }
            p {
                style: "margin: 0; font-size: 12px; color: #6b7280; text-align: center;",
                "{detail}"
            }
        }
    }
}
