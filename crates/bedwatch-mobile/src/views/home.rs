use bedwatch_core::forms::{load_availability, save_availability, AvailabilityForm};
use dioxus::prelude::*;
use dioxus_primitives::label::Label;
use dioxus_primitives::toast::use_toast;

use crate::auth::Backend;
use crate::ui::{show_alert, ButtonVariant, UiButton, UiInput, LABEL_STYLE};

const SECTION_TITLE_STYLE: &str =
    "margin: 12px 0 0 0; font-size: 15px; font-weight: 700; color: #111827;";

#[component]
pub fn HomeScreen() -> Element {
    let backend = use_context::<Backend>();
    let toasts = use_toast();
    let mut form = use_signal(AvailabilityForm::default);
    let mut loading = use_signal(|| true);
    let mut saving = use_signal(|| false);

    let load_backend = backend.clone();
    use_future(move || {
        let backend = load_backend.clone();
        async move {
            let session = backend.session.current();
            let (loaded, alert) = load_availability(&backend.hospitals, session.as_ref()).await;
            form.set(loaded);
            loading.set(false);
            if let Some(alert) = alert {
                show_alert(toasts, &alert);
            }
        }
    });

    let save_backend = backend.clone();
    let on_save = move |_| {
        if saving() {
            return;
        }
        saving.set(true);

        let backend = save_backend.clone();
        let fields = form();
        spawn(async move {
            let session = backend.session.current();
            let alert = save_availability(&backend.hospitals, session.as_ref(), &fields).await;
            saving.set(false);
            show_alert(toasts, &alert);
        });
    };

    let on_sign_out = move |_| {
        let holder = backend.session.clone();
        spawn(async move {
            if let Err(error) = holder.sign_out().await {
                tracing::warn!("Sign-out did not reach the backend: {}", error);
            }
        });
    };

    if loading() {
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
                "Loading hospital info..."
            }
        };
    }

    let current = form();

    rsx! {
        div {
            style: "
                min-height: 100vh;
                padding: 16px;
                background: #f6f8fb;
                font-family: system-ui, sans-serif;
            ",
            div {
                style: "
                    background: #ffffff;
                    border: 1px solid #e5e7eb;
                    border-radius: 12px;
                    padding: 16px;
                    display: flex;
                    flex-direction: column;
                    gap: 8px;
                ",
                div {
                    style: "display: flex; justify-content: space-between; align-items: center;",
                    h1 {
                        style: "margin: 0; font-size: 20px; color: #111827;",
                        "🏥 Hospital Management"
                    }
                    UiButton {
                        type: "button",
                        variant: ButtonVariant::Outline,
                        onclick: on_sign_out,
                        "Sign out"
                    }
                }
                p {
                    style: "margin: 0; font-size: 13px; color: #6b7280;",
                    "Update bed and scan availability"
                }

                p { style: SECTION_TITLE_STYLE, "🛏️ Bed Availability" }
                Label {
                    html_for: "beds-available",
                    style: LABEL_STYLE,
                    "Beds Available"
                }
                UiInput {
                    id: "beds-available",
                    r#type: "text",
                    inputmode: "numeric",
                    value: "{current.beds_available}",
                    oninput: move |event: Event<FormData>| {
                        form.write().beds_available = event.value();
                    },
                }
                Label {
                    html_for: "total-beds",
                    style: LABEL_STYLE,
                    "Total Beds"
                }
                UiInput {
                    id: "total-beds",
                    r#type: "text",
                    inputmode: "numeric",
                    value: "{current.total_beds}",
                    oninput: move |event: Event<FormData>| {
                        form.write().total_beds = event.value();
                    },
                }

                p { style: SECTION_TITLE_STYLE, "🧪 Scan Availability" }
                Label {
                    html_for: "ct-scan-date",
                    style: LABEL_STYLE,
                    "CT Scan Available Date (YYYY-MM-DD)"
                }
                UiInput {
                    id: "ct-scan-date",
                    r#type: "text",
                    placeholder: "e.g., 2025-09-25",
                    value: "{current.ct_scan_date}",
                    oninput: move |event: Event<FormData>| {
                        form.write().ct_scan_date = event.value();
                    },
                }
                Label {
                    html_for: "mri-date",
                    style: LABEL_STYLE,
                    "MRI Available Date (YYYY-MM-DD)"
                }
                UiInput {
                    id: "mri-date",
                    r#type: "text",
                    placeholder: "e.g., 2025-10-01",
                    value: "{current.mri_date}",
                    oninput: move |event: Event<FormData>| {
                        form.write().mri_date = event.value();
                    },
                }

                UiButton {
                    type: "button",
                    block: true,
                    variant: ButtonVariant::Primary,
                    style: "margin-top: 12px; font-size: 14px; padding: 12px;",
                    disabled: saving(),
                    onclick: on_save,
                    if saving() { "Saving..." } else { "💾 Save Changes" }
                }
            }
        }
    }
}
