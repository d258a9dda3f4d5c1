//! Forwards Android foreground/background transitions to the session holder.

use std::sync::Arc;

use bedwatch_core::session::{AppLifecycle, SessionHolder};
use dioxus::mobile::tao::event::Event;
use dioxus::mobile::use_wry_event_handler;

use crate::auth::SessionStore;

/// Map a window-loop event to an app state change, if it is one.
pub fn lifecycle_for<T>(event: &Event<'_, T>) -> Option<AppLifecycle> {
    match event {
        Event::Resumed => Some(AppLifecycle::Active),
        Event::Suspended => Some(AppLifecycle::Inactive),
        _ => None,
    }
}

pub fn use_app_lifecycle(holder: Arc<SessionHolder<SessionStore>>) {
    use_wry_event_handler(move |event, _| {
        if let Some(state) = lifecycle_for(event) {
            tracing::debug!(?state, "App lifecycle changed");
            holder.set_app_state(state);
        }
    });
}
