//! bedwatch-core - Core library for Bedwatch
//!
//! Supabase sign-in, the shared session holder, and read/write access to the
//! hospital row owned by the signed-in administrator. The mobile shell only
//! renders what this crate decides.

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod records;
pub mod router;
pub mod session;
pub mod util;

pub use auth::{
    AuthError, AuthSession, AuthUser, MemorySessionStore, SessionPersistence, SupabaseAuthClient,
};
pub use config::{BackendConfig, BackendEndpoint, ConfigError};
pub use error::{Error, Result};
pub use models::{HospitalAvailability, HospitalRecord, RecordOutcome};
pub use records::{HospitalClient, HospitalService, RecordError};
pub use router::{route_for, Route};
pub use session::{AppLifecycle, AuthChange, SessionHolder, SessionSubscription};
