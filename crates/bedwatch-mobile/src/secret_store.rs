//! Platform keystore access for small secrets.
//!
//! Android uses the native keystore. Other targets (unit tests, host builds)
//! get keyring-core's in-memory mock store.

use std::sync::{Arc, OnceLock};

use keyring_core::{CredentialStore, Entry, Error as KeyringError};
use thiserror::Error;

const SECRET_SERVICE_NAME: &str = "bedwatch-mobile";
pub const SECRET_SUPABASE_SESSION: &str = "supabase_session";

#[derive(Debug, Clone, Error)]
pub enum SecretStoreError {
    #[error("failed to initialize secure store: {0}")]
    Unavailable(String),
    #[error("secret value must not be empty")]
    EmptyValue,
    #[error("{0}")]
    Keyring(String),
}

type SecretResult<T> = Result<T, SecretStoreError>;

static STORE_INIT: OnceLock<SecretResult<()>> = OnceLock::new();

/// Whether a secure store could be set up on this device.
pub fn is_available() -> bool {
    ensure_store().is_ok()
}

pub fn write_secret(name: &str, value: &str) -> SecretResult<()> {
    if value.trim().is_empty() {
        return Err(SecretStoreError::EmptyValue);
    }
    entry(name)?.set_password(value).map_err(map_keyring_error)
}

pub fn read_secret(name: &str) -> SecretResult<Option<String>> {
    match entry(name)?.get_password() {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(error) => Err(map_keyring_error(error)),
    }
}

pub fn delete_secret(name: &str) -> SecretResult<()> {
    match entry(name)?.delete_credential() {
        Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
        Err(error) => Err(map_keyring_error(error)),
    }
}

fn entry(name: &str) -> SecretResult<Entry> {
    ensure_store()?;
    Entry::new(SECRET_SERVICE_NAME, name).map_err(map_keyring_error)
}

fn ensure_store() -> SecretResult<()> {
    STORE_INIT.get_or_init(initialize_store).clone()
}

#[cfg(target_os = "android")]
fn initialize_store() -> SecretResult<()> {
    let store: Arc<CredentialStore> = android_native_keyring_store::Store::new()
        .map_err(|error| SecretStoreError::Unavailable(error.to_string()))?;
    keyring_core::set_default_store(store);
    Ok(())
}

#[cfg(not(target_os = "android"))]
fn initialize_store() -> SecretResult<()> {
    let store: Arc<CredentialStore> = keyring_core::mock::Store::new()
        .map_err(|error| SecretStoreError::Unavailable(error.to_string()))?;
    keyring_core::set_default_store(store);
    Ok(())
}

fn map_keyring_error(error: KeyringError) -> SecretStoreError {
    match error {
        KeyringError::NoDefaultStore => {
            SecretStoreError::Unavailable("secure store is not initialized".to_string())
        }
        other => SecretStoreError::Keyring(other.to_string()),
    }
}
