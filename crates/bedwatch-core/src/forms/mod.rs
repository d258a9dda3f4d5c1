//! Screen logic that does not depend on a UI toolkit.

mod alert;
mod availability;
mod login;

pub use alert::{Alert, AlertKind};
pub use availability::{
    fetch_alert, load_availability, save_alert, save_availability, AvailabilityForm, FormError,
};
pub use login::{Credentials, LoginForm, LoginSubmit};
