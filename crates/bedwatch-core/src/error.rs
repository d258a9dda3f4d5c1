//! Error types for bedwatch-core

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::forms::FormError;
use crate::records::RecordError;

/// Result type alias using bedwatch-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure a bedwatch-core operation can report
#[derive(Error, Debug)]
pub enum Error {
    /// Backend settings are missing or malformed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sign-in, refresh, or session storage failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Reading or writing the hospital row failed
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Form input was rejected before reaching the backend
    #[error(transparent)]
    Form(#[from] FormError),
}
