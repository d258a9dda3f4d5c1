use bedwatch_core::forms::{LoginForm, LoginSubmit};
use dioxus::prelude::*;
use dioxus_primitives::label::Label;
use dioxus_primitives::toast::use_toast;

use crate::auth::Backend;
use crate::ui::{show_alert, ButtonVariant, UiButton, UiInput, LABEL_STYLE};

#[component]
pub fn LoginScreen() -> Element {
    let backend = use_context::<Backend>();
    let toasts = use_toast();
    let mut form = use_signal(LoginForm::default);

    let on_sign_in = move |_| {
        let credentials = match form.write().begin_submit() {
            LoginSubmit::Ready(credentials) => credentials,
            LoginSubmit::Busy => return,
            LoginSubmit::Rejected(alert) => {
                show_alert(toasts, &alert);
                return;
            }
        };

        let holder = backend.session.clone();
        spawn(async move {
            let result = holder
                .sign_in(&credentials.email, &credentials.password)
                .await;
            if let Some(alert) = form.write().finish(&result) {
                show_alert(toasts, &alert);
            }
        });
    };

    let loading = form.read().loading;
    let email = form.read().email.clone();
    let password = form.read().password.clone();

    rsx! {
        div {
            style: "
                min-height: 100vh;
                display: flex;
                align-items: center;
                justify-content: center;
                padding: 20px;
                background: #f6f8fb;
                font-family: system-ui, sans-serif;
            ",
            div {
                style: "
                    width: 100%;
                    max-width: 360px;
                    background: #ffffff;
                    border: 1px solid #e5e7eb;
                    border-radius: 12px;
                    padding: 20px;
                    display: flex;
                    flex-direction: column;
                    gap: 10px;
                ",
                h1 {
                    style: "margin: 0; font-size: 22px; color: #111827;",
                    "Welcome Back 👋"
                }
                p {
                    style: "margin: 0 0 8px 0; font-size: 13px; color: #6b7280;",
                    "Sign in to continue"
                }

                Label {
                    html_for: "login-email",
                    style: LABEL_STYLE,
                    "Email"
                }
                UiInput {
                    id: "login-email",
                    r#type: "email",
                    autocapitalize: "none",
                    autocomplete: "email",
                    value: "{email}",
                    oninput: move |event: Event<FormData>| {
                        form.write().email = event.value();
                    },
                }

                Label {
                    html_for: "login-password",
                    style: LABEL_STYLE,
                    "Password"
                }
                UiInput {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: "{password}",
                    oninput: move |event: Event<FormData>| {
                        form.write().password = event.value();
                    },
                }

                UiButton {
                    type: "button",
                    block: true,
                    variant: ButtonVariant::Primary,
                    style: "margin-top: 8px; font-size: 14px; padding: 12px;",
                    disabled: loading,
                    onclick: on_sign_in,
                    if loading { "Signing in..." } else { "Sign In" }
                }
            }
        }
    }
}
